//! Application State

use std::sync::Arc;
use std::time::Duration;

use agent_core::{LlmProvider, ToolRegistry};
use vehicle_advisor::{CatalogStore, ChatEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Conversational engine answering `/chat`
    pub engine: Arc<ChatEngine>,

    /// Catalog tools
    pub tools: Arc<ToolRegistry>,

    /// Read-only catalog shared by the engine and the tools
    pub catalog: Arc<dyn CatalogStore>,

    /// Generative model (None unless the fallback is enabled)
    pub provider: Option<Arc<dyn LlmProvider>>,

    /// Deadline applied to every chat and tool request
    pub request_timeout: Duration,
}
