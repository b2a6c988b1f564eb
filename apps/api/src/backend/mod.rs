//! Recruiting backend client. Every REST call the dashboard makes goes through
//! the `RecruiterBackend` trait.
//!
//! `HttpBackend` is the production implementation over reqwest. Calls are never
//! retried; failures are reported to the caller, which decides whether to fall
//! back to mock data or surface the message.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::interview::{
    AvailabilityWindow, CreatedInterview, InterviewNote, NewInterview,
};
use crate::models::pipeline::{CandidateDetail, PipelineEntry};
use crate::models::role::{CreatedRole, NewRole, RoleSummary};

#[cfg(test)]
pub mod fake;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error (status {status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    /// Message safe to show a recruiter next to the action that failed.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Http(_) => "Cannot connect to the recruiting backend.".to_string(),
            BackendError::Api { detail, .. } => detail.clone(),
            BackendError::Parse(_) => "Unexpected response from the recruiting backend.".to_string(),
        }
    }
}

/// The REST collaborator behind the dashboard. Carried in `AppState` as
/// `Arc<dyn RecruiterBackend>`.
#[async_trait]
pub trait RecruiterBackend: Send + Sync {
    async fn fetch_pipeline(&self, role_id: Option<i64>) -> Result<Vec<PipelineEntry>, BackendError>;

    async fn fetch_candidate(&self, candidate_id: &str) -> Result<CandidateDetail, BackendError>;

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, BackendError>;

    async fn create_role(&self, role: &NewRole) -> Result<CreatedRole, BackendError>;

    async fn add_availability(&self, window: &AvailabilityWindow) -> Result<(), BackendError>;

    async fn create_interview(&self, interview: &NewInterview)
        -> Result<CreatedInterview, BackendError>;

    async fn post_interview_note(
        &self,
        interview_id: i64,
        note: &InterviewNote,
    ) -> Result<(), BackendError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    api_base: String,
    recruiter_id: i64,
}

impl HttpBackend {
    pub fn new(api_base: &str, recruiter_id: i64, timeout: Duration) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_base: api_base.trim_end_matches('/').to_string(),
            recruiter_id,
        })
    }

    fn recruiter_url(&self, path: &str) -> String {
        format!("{}/recruiters/{}/{}", self.api_base, self.recruiter_id, path)
    }

    fn pipeline_url(&self, role_id: Option<i64>) -> String {
        let url = self.recruiter_url("pipeline");
        match role_id {
            Some(role_id) => format!("{url}?role_id={role_id}"),
            None => url,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, BackendError> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        debug!("POST {url}");
        let response = self.client.post(url).json(body).send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl RecruiterBackend for HttpBackend {
    async fn fetch_pipeline(&self, role_id: Option<i64>) -> Result<Vec<PipelineEntry>, BackendError> {
        self.get_json(&self.pipeline_url(role_id)).await
    }

    async fn fetch_candidate(&self, candidate_id: &str) -> Result<CandidateDetail, BackendError> {
        self.get_json(&self.recruiter_url(&format!("candidates/{candidate_id}")))
            .await
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, BackendError> {
        self.get_json(&self.recruiter_url("roles")).await
    }

    async fn create_role(&self, role: &NewRole) -> Result<CreatedRole, BackendError> {
        self.post_json(&self.recruiter_url("roles"), role).await
    }

    async fn add_availability(&self, window: &AvailabilityWindow) -> Result<(), BackendError> {
        let _: serde_json::Value = self
            .post_json(&self.recruiter_url("availability"), window)
            .await?;
        Ok(())
    }

    async fn create_interview(
        &self,
        interview: &NewInterview,
    ) -> Result<CreatedInterview, BackendError> {
        self.post_json(&self.recruiter_url("interviews"), interview)
            .await
    }

    async fn post_interview_note(
        &self,
        interview_id: i64,
        note: &InterviewNote,
    ) -> Result<(), BackendError> {
        let url = self.recruiter_url(&format!("interviews/{interview_id}/notes"));
        let _: serde_json::Value = self.post_json(&url, note).await?;
        Ok(())
    }
}

/// Decodes a 2xx body, or turns anything else into `BackendError::Api`.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Backend returned {status}: {body}");
        return Err(BackendError::Api {
            status: status.as_u16(),
            detail: normalize_detail(status, &body),
        });
    }

    // Some write endpoints answer with an empty body.
    if body.trim().is_empty() {
        return Ok(serde_json::from_str("null")?);
    }
    Ok(serde_json::from_str(&body)?)
}

/// Extracts a displayable message from an error body's `detail` field.
/// Strings are used verbatim; arrays and objects (validation errors) are
/// serialized back to JSON text.
pub fn normalize_detail(status: StatusCode, body: &str) -> String {
    let fallback = || format!("Status {}", status.as_u16());
    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(body) else {
        return fallback();
    };
    match parsed.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(detail @ (serde_json::Value::Array(_) | serde_json::Value::Object(_))) => {
            detail.to_string()
        }
        _ => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string_is_verbatim() {
        let msg = normalize_detail(StatusCode::NOT_FOUND, r#"{"detail": "Recruiter not found"}"#);
        assert_eq!(msg, "Recruiter not found");
    }

    #[test]
    fn test_detail_array_is_serialized() {
        let body = r#"{"detail": [{"loc": ["body", "title"], "msg": "field required"}]}"#;
        let msg = normalize_detail(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert!(msg.starts_with('['));
        assert!(msg.contains("field required"));
    }

    #[test]
    fn test_detail_object_is_serialized() {
        let msg = normalize_detail(StatusCode::FORBIDDEN, r#"{"detail": {"reason": "company"}}"#);
        assert_eq!(msg, r#"{"reason":"company"}"#);
    }

    #[test]
    fn test_missing_detail_falls_back_to_status() {
        assert_eq!(normalize_detail(StatusCode::BAD_GATEWAY, "{}"), "Status 502");
        assert_eq!(
            normalize_detail(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Status 500"
        );
    }

    #[test]
    fn test_api_error_user_message_is_detail() {
        let err = BackendError::Api {
            status: 403,
            detail: "Recruiter does not belong to this company".to_string(),
        };
        assert_eq!(err.user_message(), "Recruiter does not belong to this company");
    }

    #[test]
    fn test_recruiter_url_trims_trailing_slash() {
        let backend =
            HttpBackend::new("http://127.0.0.1:8000/", 7, Duration::from_secs(5)).unwrap();
        assert_eq!(
            backend.recruiter_url("pipeline"),
            "http://127.0.0.1:8000/recruiters/7/pipeline"
        );
    }

    #[test]
    fn test_pipeline_url_carries_optional_role_filter() {
        let backend = HttpBackend::new("http://127.0.0.1:8000", 7, Duration::from_secs(5)).unwrap();
        assert_eq!(
            backend.pipeline_url(None),
            "http://127.0.0.1:8000/recruiters/7/pipeline"
        );
        assert_eq!(
            backend.pipeline_url(Some(12)),
            "http://127.0.0.1:8000/recruiters/7/pipeline?role_id=12"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        // Port 9 (discard) is closed on test hosts; the connect fails fast.
        let backend = HttpBackend::new("http://127.0.0.1:9", 1, Duration::from_secs(2)).unwrap();
        let err = backend.list_roles().await.unwrap_err();
        assert!(matches!(err, BackendError::Http(_)));
        assert_eq!(err.user_message(), "Cannot connect to the recruiting backend.");
    }
}
