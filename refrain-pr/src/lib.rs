//! refrain-pr library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::NamingSession;
use crate::services::NamingOrchestrator;

/// Maximum retained sessions; storing beyond this evicts the oldest
pub const MAX_SESSIONS: usize = 64;

/// Application state shared across handlers
///
/// Sessions are isolated per id: each holds its own snapshot, suggestion
/// cache, and selection, so concurrent users never observe each other's
/// workflow state.
#[derive(Clone)]
pub struct AppState {
    /// Workflow orchestrator holding the outbound clients
    pub orchestrator: Arc<NamingOrchestrator>,
    /// Per-session workflow state, keyed by session id
    pub sessions: Arc<RwLock<HashMap<Uuid, NamingSession>>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(orchestrator: NamingOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Record the most recent failure for the /health diagnostics
    pub async fn record_error(&self, message: &str) {
        *self.last_error.write().await = Some(message.to_string());
    }

    /// Insert or replace a session in the store
    ///
    /// Re-storing an existing session id replaces the entry in place.
    /// When a brand-new id pushes the store past [`MAX_SESSIONS`], the
    /// oldest sessions by start time are evicted so abandoned browser
    /// tabs cannot grow the map for the life of the process.
    pub async fn store_session(&self, session: NamingSession) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.session_id, session);
        while sessions.len() > MAX_SESSIONS {
            let oldest = sessions
                .values()
                .min_by_key(|s| s.started_at)
                .map(|s| s.session_id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // API routes
        .merge(api::session_routes())
        .merge(api::health_routes())
        .with_state(state)
}
