//! Scout engine: HTTP client and poll-loop execution for the workflow.
mod api;
mod engine;
mod poller;
mod settings;

pub use api::{ApiError, HttpSearchApi, ResumeFile, SearchApi};
pub use engine::{EngineEvent, EngineHandle};
pub use poller::{start_polling, PollOutcome, PollSink, PollerHandle};
pub use settings::{ApiSettings, API_URL_ENV};
