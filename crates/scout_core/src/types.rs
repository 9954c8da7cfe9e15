use std::fmt;

use serde::{Deserialize, Serialize};

/// File types the backend's resume parser accepts.
pub const SUPPORTED_RESUME_MIME_TYPES: [&str; 3] =
    ["application/pdf", "image/jpeg", "image/png"];

/// Local gate applied before any upload leaves the client.
pub fn is_supported_resume_mime(mime_type: &str) -> bool {
    SUPPORTED_RESUME_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(mime_type.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompanySize {
    #[default]
    Any,
    Startup,
    Small,
    Medium,
    Large,
}

/// User-entered search preferences. Everything but `additional_info`
/// is required; see [`crate::update`] for the form validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub location: String,
    pub company_size: CompanySize,
    pub role_type: String,
    #[serde(default)]
    pub additional_info: String,
}

/// Opaque structured summary the backend builds from the uploaded file.
/// The client stores and forwards it, never inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary(pub serde_json::Value);

/// Opaque identifier for one submitted search job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Started,
    Progress,
    Success,
    Failure,
}

impl TaskStatus {
    /// Polling must never continue past a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failure)
    }
}

/// One job match, passed through from the backend verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub apply_link: String,
}

/// Snapshot of partial results carried by a poll response. Each snapshot
/// is authoritative: it replaces whatever an earlier poll delivered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub current_jobs: Vec<JobListing>,
    #[serde(default)]
    pub followup_questions: Vec<String>,
}

/// Decoded body of `GET /api/task/{task_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub result: Option<SearchResults>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Upload or job-launch round trip failed. The user retries manually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for SubmitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "{} (http status {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A status poll failed in transport or decoding. Fatal to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollFailure {
    pub message: String,
}

impl fmt::Display for PollFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// User-visible error taxonomy for the whole workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// Rejected locally; never reached the network.
    Validation(String),
    /// Upload or search submission failed; resubmit to retry.
    Submission(SubmitFailure),
    /// Polling ended in failure; restart from the preferences stage.
    Polling(String),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::Validation(message) => write!(f, "invalid input: {message}"),
            WorkflowError::Submission(failure) => write!(f, "submission failed: {failure}"),
            WorkflowError::Polling(message) => write!(f, "search failed: {message}"),
        }
    }
}
