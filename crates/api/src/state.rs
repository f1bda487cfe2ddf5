use botstate_core::BotStore;
use std::sync::Arc;

/// Shared application state accessible by all route handlers.
pub struct AppState {
    pub store: Arc<dyn BotStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BotStore>) -> Self {
        Self { store }
    }
}
