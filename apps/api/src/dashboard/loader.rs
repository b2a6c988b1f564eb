use tracing::{info, warn};

use crate::backend::RecruiterBackend;
use crate::dashboard::fixtures::MockCatalog;
use crate::dashboard::DataSource;
use crate::models::pipeline::{Candidate, Job};

/// Jobs and candidates for one load, with where each came from.
#[derive(Debug, Clone)]
pub struct PipelineData {
    pub jobs: Vec<Job>,
    pub candidates: Vec<Candidate>,
    pub jobs_source: DataSource,
    pub candidates_source: DataSource,
}

/// Fetches roles and the pipeline from the backend. Either dataset falls back
/// to the mock catalog when its call fails or comes back empty.
pub async fn load_pipeline(
    backend: &dyn RecruiterBackend,
    mock: &MockCatalog,
    role_id: Option<i64>,
) -> PipelineData {
    let (jobs, jobs_source) = match backend.list_roles().await {
        Ok(roles) if !roles.is_empty() => {
            (roles.into_iter().map(Job::from).collect(), DataSource::Backend)
        }
        Ok(_) => {
            info!("Backend has no roles; using mock jobs");
            (mock.jobs.clone(), DataSource::Mock)
        }
        Err(e) => {
            warn!("Error loading roles, using mock jobs: {e}");
            (mock.jobs.clone(), DataSource::Mock)
        }
    };

    let (candidates, candidates_source) = match backend.fetch_pipeline(role_id).await {
        Ok(entries) if !entries.is_empty() => (
            entries.into_iter().map(Candidate::from).collect(),
            DataSource::Backend,
        ),
        Ok(_) => {
            info!("Pipeline is empty; using mock candidates");
            (mock.candidates.clone(), DataSource::Mock)
        }
        Err(e) => {
            warn!("Error fetching candidates, using mock pipeline: {e}");
            (mock.candidates.clone(), DataSource::Mock)
        }
    };

    PipelineData {
        jobs,
        candidates,
        jobs_source,
        candidates_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::dashboard::fixtures::mock_catalog;
    use crate::models::pipeline::PipelineEntry;
    use crate::models::role::{RoleRequirement, RoleSummary};

    #[tokio::test]
    async fn test_offline_backend_falls_back_to_mock() {
        let mock = mock_catalog().unwrap();
        let backend = FakeBackend::offline();
        let data = load_pipeline(&backend, &mock, None).await;

        assert_eq!(data.jobs_source, DataSource::Mock);
        assert_eq!(data.candidates_source, DataSource::Mock);
        assert_eq!(data.jobs, mock.jobs);
        assert_eq!(data.candidates.len(), 4);
        assert_eq!(*backend.pipeline_requests.lock().await, vec![None]);
    }

    #[tokio::test]
    async fn test_empty_backend_falls_back_to_mock() {
        let mock = mock_catalog().unwrap();
        let data = load_pipeline(&FakeBackend::default(), &mock, None).await;
        assert_eq!(data.jobs_source, DataSource::Mock);
        assert_eq!(data.candidates_source, DataSource::Mock);
    }

    #[tokio::test]
    async fn test_backend_data_is_mapped() {
        let backend = FakeBackend::default();
        backend.roles.lock().await.push(RoleSummary {
            role_id: 5,
            company_id: Some(1),
            title: "Data Engineer".to_string(),
            description: None,
            requirements: vec![RoleRequirement {
                id: Some(1),
                text: "SQL".to_string(),
                level: Some(2),
            }],
        });
        backend.pipeline.lock().await.push(PipelineEntry {
            candidate_id: 31,
            display_name: None,
            role_title: Some("Data Engineer".to_string()),
            match_score: Some(64.0),
            last_updated: Some("2025-12-01T09:00:00".to_string()),
        });

        let mock = mock_catalog().unwrap();
        let data = load_pipeline(&backend, &mock, Some(5)).await;

        assert_eq!(data.jobs_source, DataSource::Backend);
        assert_eq!(data.jobs[0].id, "5");
        assert_eq!(data.jobs[0].requirements, vec!["SQL"]);
        assert_eq!(data.candidates_source, DataSource::Backend);
        assert_eq!(data.candidates[0].id, "31");
        assert_eq!(*backend.pipeline_requests.lock().await, vec![Some(5)]);
    }
}
