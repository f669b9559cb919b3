use axum::extract::FromRef;
use std::sync::Arc;

use crate::config::Settings;
use crate::security::RateLimiter;
use crate::services::SessionService;
use crate::storage::{FileSessionStore, StoreError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<FileSessionStore>,
    pub rate_limiter: Arc<RateLimiter>,
    pub session_service: Arc<SessionService>,
}

impl AppState {
    /// Open the sessions directory and wire the service graph.
    pub async fn from_settings(settings: Settings) -> Result<Self, StoreError> {
        let store = Arc::new(FileSessionStore::open(&settings.storage.sessions_dir).await?);

        let rate_limiter = Arc::new(RateLimiter::new(
            settings.limits.rate_window(),
            settings.limits.rate_max,
        ));

        let session_service = Arc::new(SessionService::new(
            store.clone(),
            rate_limiter.clone(),
            settings.limits.max_contacts,
        ));

        Ok(Self {
            settings: Arc::new(settings),
            store,
            rate_limiter,
            session_service,
        })
    }
}

impl FromRef<AppState> for Arc<Settings> {
    fn from_ref(state: &AppState) -> Self {
        state.settings.clone()
    }
}

impl FromRef<AppState> for Arc<SessionService> {
    fn from_ref(state: &AppState) -> Self {
        state.session_service.clone()
    }
}

impl FromRef<AppState> for Arc<FileSessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
