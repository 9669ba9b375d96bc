// Application state module
// Shared, read-only state handed to every connection

use std::sync::Arc;

use super::types::Config;
use crate::storage::MessageStore;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Storage backend selected at startup
    pub store: Arc<dyn MessageStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn MessageStore>) -> Self {
        Self { config, store }
    }
}
