//! Server state shared by every handler.

use std::sync::Arc;

use kentix_core::ConfigStore;

/// Maximum accepted request body (1 MB). Configuration bodies are small.
pub const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

/// State cloned into each request.
#[derive(Clone)]
pub struct ServerState {
    /// Store shared with the poll scheduler.
    pub store: Arc<dyn ConfigStore>,
    /// Server start time (unix seconds).
    pub started_at: i64,
}

impl ServerState {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            started_at: chrono::Utc::now().timestamp(),
        }
    }
}
