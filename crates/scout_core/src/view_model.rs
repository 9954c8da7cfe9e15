use crate::{JobListing, PollPhase, Stage};

/// Everything the presentation layer needs to render the current step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowView {
    pub stage: Stage,
    pub phase: PollPhase,
    /// An upload or search submission is in flight.
    pub busy: bool,
    /// Backend-reported completion, 0..=100.
    pub progress: u8,
    pub job_count: usize,
    pub job_listings: Vec<JobListing>,
    pub followup_questions: Vec<String>,
    pub error: Option<String>,
}
