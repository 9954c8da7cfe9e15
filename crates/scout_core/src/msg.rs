use crate::{PollFailure, Preferences, ResumeSummary, StatusReport, SubmitFailure, TaskId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a resume file (name plus declared MIME type).
    ResumeChosen {
        file_name: String,
        mime_type: String,
    },
    /// Upload round trip finished.
    UploadFinished(Result<ResumeSummary, SubmitFailure>),
    /// User submitted the preferences form.
    PreferencesSubmitted(Preferences),
    /// Search submission round trip finished.
    SearchAccepted(Result<TaskId, SubmitFailure>),
    /// One poll of the task endpoint resolved.
    PollArrived(Result<StatusReport, PollFailure>),
    /// User navigated away from the results view.
    ResultsClosed,
    /// Fallback for placeholder wiring.
    NoOp,
}
