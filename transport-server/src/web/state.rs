//! Application state for the web layer.

use std::sync::Arc;

use crate::tools::ToolSurface;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Tool Surface over the dispatcher
    pub tools: Arc<ToolSurface>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(tools: ToolSurface) -> Self {
        Self {
            tools: Arc::new(tools),
        }
    }
}
