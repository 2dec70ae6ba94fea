//! Application state shared across HTTP handlers.

use crate::providers::EmailProvider;
use crate::stores::{EventStore, UserStore};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// All dependencies are constructed once at process start and injected
/// explicitly; nothing here is module-level mutable state. Cloning is
/// cheap (everything is behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// User profile and friend graph storage.
    pub users: Arc<dyn UserStore>,
    /// Event and registration storage.
    pub events: Arc<dyn EventStore>,
    /// E-ticket email delivery.
    pub mailer: Arc<dyn EmailProvider>,
    /// Static bearer token required on API requests.
    pub api_token: Arc<str>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        events: Arc<dyn EventStore>,
        mailer: Arc<dyn EmailProvider>,
        api_token: &str,
    ) -> Self {
        Self {
            users,
            events,
            mailer,
            api_token: Arc::from(api_token),
        }
    }
}
