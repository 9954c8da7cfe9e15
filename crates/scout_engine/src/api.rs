use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use scout_core::{PollFailure, Preferences, ResumeSummary, StatusReport, SubmitFailure, TaskId};
use serde::{Deserialize, Serialize};

use crate::ApiSettings;

/// Payload for the resume upload. The MIME gate in the core has already
/// run by the time one of these is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("http status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Boundary conversion for the upload and launch round trips.
    pub fn submit_failure(&self) -> SubmitFailure {
        match self {
            ApiError::Status { status, message } => SubmitFailure {
                status: Some(*status),
                message: message.clone(),
            },
            other => SubmitFailure {
                status: None,
                message: other.to_string(),
            },
        }
    }

    /// Boundary conversion for the status poll.
    pub fn poll_failure(&self) -> PollFailure {
        PollFailure {
            message: self.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    summary: ResumeSummary,
}

#[derive(Debug, Deserialize)]
struct DeepSearchResponse {
    task_id: String,
}

#[derive(Debug, Serialize)]
struct DeepSearchRequest<'a> {
    resume_summary: &'a ResumeSummary,
    preferences: &'a Preferences,
}

/// Seam between the workflow and the backend. The poll loop and the tests
/// only ever see this trait.
#[async_trait::async_trait]
pub trait SearchApi: Send + Sync {
    async fn upload_resume(&self, file: ResumeFile) -> Result<ResumeSummary, ApiError>;
    async fn deep_search(
        &self,
        resume_summary: &ResumeSummary,
        preferences: &Preferences,
    ) -> Result<TaskId, ApiError>;
    async fn task_status(&self, task_id: &TaskId) -> Result<StatusReport, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpSearchApi {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl HttpSearchApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn require_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.to_string()
        } else {
            body
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl SearchApi for HttpSearchApi {
    async fn upload_resume(&self, file: ResumeFile) -> Result<ResumeSummary, ApiError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name)
            .mime_str(&file.mime_type)
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("/api/upload_resume"))
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = Self::require_success(response).await?;
        let body: UploadResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(body.summary)
    }

    async fn deep_search(
        &self,
        resume_summary: &ResumeSummary,
        preferences: &Preferences,
    ) -> Result<TaskId, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/api/deep_search"))
            .json(&DeepSearchRequest {
                resume_summary,
                preferences,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = Self::require_success(response).await?;
        let body: DeepSearchResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(TaskId(body.task_id))
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<StatusReport, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&format!("/api/task/{task_id}")))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = Self::require_success(response).await?;
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}
