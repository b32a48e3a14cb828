use std::sync::Arc;

use crate::config::Config;
use crate::persistence::ResumeStore;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Pluggable persistence backend. Default: InMemoryResumeStore.
    pub resumes: Arc<dyn ResumeStore>,
    pub config: Config,
}
