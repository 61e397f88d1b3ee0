use std::sync::Arc;

use crate::config::Config;
use crate::interview::registry::SessionRegistry;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<LlmClient>,
    /// Process-wide session map; sessions live until the process exits.
    pub registry: Arc<SessionRegistry>,
    #[allow(dead_code)]
    pub config: Config,
}
