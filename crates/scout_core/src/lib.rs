//! Scout core: pure workflow state machine and session-store helpers.
mod effect;
mod msg;
mod session;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use session::{
    load_resume_summary, load_task_id, require_resume, require_task, store_resume_summary,
    store_task_id, GuardRedirect, MemorySessionStore, SessionStore, RESUME_SUMMARY_KEY,
    TASK_ID_KEY,
};
pub use state::{PollPhase, Stage, WorkflowState};
pub use types::{
    is_supported_resume_mime, CompanySize, JobListing, PollFailure, Preferences, ResumeSummary,
    SearchResults, StatusReport, SubmitFailure, TaskId, TaskStatus, WorkflowError,
    SUPPORTED_RESUME_MIME_TYPES,
};
pub use update::update;
pub use view_model::WorkflowView;
