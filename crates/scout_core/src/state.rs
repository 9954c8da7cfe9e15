use crate::view_model::WorkflowView;
use crate::{JobListing, SearchResults, WorkflowError};

/// Pages of the multi-step workflow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Upload,
    Preferences,
    Results,
}

/// Task-poller lifecycle. Succeeded and Failed are terminal: once reached,
/// no poll response may move the machine again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    #[default]
    Idle,
    Polling,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowState {
    stage: Stage,
    phase: PollPhase,
    uploading: bool,
    launching: bool,
    progress: u8,
    job_listings: Vec<JobListing>,
    followup_questions: Vec<String>,
    error: Option<WorkflowError>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn view(&self) -> WorkflowView {
        WorkflowView {
            stage: self.stage,
            phase: self.phase,
            busy: self.uploading || self.launching,
            progress: self.progress,
            job_count: self.job_listings.len(),
            job_listings: self.job_listings.clone(),
            followup_questions: self.followup_questions.clone(),
            error: self.error.as_ref().map(ToString::to_string),
        }
    }

    pub(crate) fn reject(&mut self, error: WorkflowError) {
        self.uploading = false;
        self.launching = false;
        self.error = Some(error);
    }

    pub(crate) fn begin_upload(&mut self) {
        self.uploading = true;
        self.error = None;
    }

    /// Upload parsed; advance to preferences. Results from any earlier
    /// search are stale once a new resume exists.
    pub(crate) fn accept_summary(&mut self) {
        self.uploading = false;
        self.error = None;
        self.stage = Stage::Preferences;
        self.phase = PollPhase::Idle;
        self.progress = 0;
        self.job_listings.clear();
        self.followup_questions.clear();
    }

    pub(crate) fn begin_launch(&mut self) {
        self.launching = true;
        self.error = None;
    }

    /// Search accepted; enter the results stage with a fresh poll session.
    pub(crate) fn enter_results(&mut self) {
        self.launching = false;
        self.error = None;
        self.stage = Stage::Results;
        self.phase = PollPhase::Polling;
        self.progress = 0;
        self.job_listings.clear();
        self.followup_questions.clear();
    }

    pub(crate) fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
    }

    /// Snapshot-replace: the latest full result set wins outright.
    pub(crate) fn replace_snapshot(&mut self, results: &SearchResults) {
        self.job_listings = results.current_jobs.clone();
        self.followup_questions = results.followup_questions.clone();
    }

    /// Terminal failure. Partial results captured so far stay visible.
    pub(crate) fn fail_polling(&mut self, message: String) {
        self.phase = PollPhase::Failed;
        self.error = Some(WorkflowError::Polling(message));
    }

    pub(crate) fn succeed_polling(&mut self) {
        self.phase = PollPhase::Succeeded;
        self.progress = 100;
    }

    pub(crate) fn leave_results(&mut self) {
        if self.phase == PollPhase::Polling {
            self.phase = PollPhase::Idle;
        }
    }
}
