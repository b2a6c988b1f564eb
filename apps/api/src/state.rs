use std::sync::Arc;

use tokio::sync::Mutex;

use crate::backend::RecruiterBackend;
use crate::dashboard::fixtures::MockCatalog;
use crate::dashboard::Dashboard;
use crate::local_store::LocalStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Recruiting backend. Default: HttpBackend against API_BASE.
    pub backend: Arc<dyn RecruiterBackend>,
    /// The recruiter's dashboard session. Actions apply one at a time.
    pub dashboard: Arc<Mutex<Dashboard>>,
    pub local_store: Arc<LocalStore>,
    /// Fallback data used when the backend is unreachable or empty.
    pub mock: Arc<MockCatalog>,
}
