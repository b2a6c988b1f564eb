use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::backend::{BackendError, RecruiterBackend};
use crate::models::interview::{
    AvailabilityWindow, CreatedInterview, InterviewNote, NewInterview,
};
use crate::models::pipeline::{CandidateDetail, PipelineEntry};
use crate::models::role::{CreatedRole, NewRole, RoleSummary};

/// In-memory backend for handler and flow tests. `offline` makes every call
/// fail the way an unreachable server does.
#[derive(Default)]
pub struct FakeBackend {
    pub offline: bool,
    pub pipeline: Mutex<Vec<PipelineEntry>>,
    /// `role_id` of every pipeline fetch, in call order.
    pub pipeline_requests: Mutex<Vec<Option<i64>>>,
    pub roles: Mutex<Vec<RoleSummary>>,
    pub created_roles: Mutex<Vec<NewRole>>,
    pub availability: Mutex<Vec<AvailabilityWindow>>,
    pub interviews: Mutex<Vec<NewInterview>>,
    pub notes: Mutex<Vec<(i64, InterviewNote)>>,
    pub next_id: AtomicI64,
}

impl FakeBackend {
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.offline {
            return Err(BackendError::Api {
                status: 503,
                detail: "Service unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 100
    }
}

#[async_trait]
impl RecruiterBackend for FakeBackend {
    async fn fetch_pipeline(&self, role_id: Option<i64>) -> Result<Vec<PipelineEntry>, BackendError> {
        self.pipeline_requests.lock().await.push(role_id);
        self.check()?;
        Ok(self.pipeline.lock().await.clone())
    }

    async fn fetch_candidate(&self, candidate_id: &str) -> Result<CandidateDetail, BackendError> {
        self.check()?;
        if candidate_id == "missing" {
            return Err(BackendError::Api {
                status: 404,
                detail: "Candidate not found".to_string(),
            });
        }
        Ok(CandidateDetail {
            id: serde_json::Value::String(candidate_id.to_string()),
            name: None,
            is_anonymous: true,
            title: Some("Engineer".to_string()),
            bio: None,
        })
    }

    async fn list_roles(&self) -> Result<Vec<RoleSummary>, BackendError> {
        self.check()?;
        Ok(self.roles.lock().await.clone())
    }

    async fn create_role(&self, role: &NewRole) -> Result<CreatedRole, BackendError> {
        self.check()?;
        self.created_roles.lock().await.push(role.clone());
        Ok(CreatedRole {
            role_id: self.allocate_id(),
        })
    }

    async fn add_availability(&self, window: &AvailabilityWindow) -> Result<(), BackendError> {
        self.check()?;
        self.availability.lock().await.push(window.clone());
        Ok(())
    }

    async fn create_interview(
        &self,
        interview: &NewInterview,
    ) -> Result<CreatedInterview, BackendError> {
        self.check()?;
        self.interviews.lock().await.push(interview.clone());
        Ok(CreatedInterview {
            interview_id: self.allocate_id(),
        })
    }

    async fn post_interview_note(
        &self,
        interview_id: i64,
        note: &InterviewNote,
    ) -> Result<(), BackendError> {
        self.check()?;
        self.notes.lock().await.push((interview_id, note.clone()));
        Ok(())
    }
}
