//! Tool Surface: named operations over the dispatcher.
//!
//! Each tool maps JSON arguments to a [`UnifiedRequest`] for one capability,
//! optionally pinned to a single provider, and returns the dispatcher's
//! `{results, errors}` unchanged.

mod args;
mod catalog;

use serde_json::Value;
use tracing::{info, instrument};

use crate::dispatch::{DispatchError, Dispatcher};
use crate::domain::{DispatchOutcome, UnifiedRequest};

pub use args::{
    ConnectionsArgs, DeparturesArgs, NearbyArgs, StationSearchArgs, VehicleArgs, parse_arguments,
};
pub use catalog::{TOOLS, ToolDefinition, ToolSpec, find};

/// Error from invoking a tool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments are not valid JSON for the tool.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// The invocable tools, bound to a dispatcher.
#[derive(Debug, Clone)]
pub struct ToolSurface {
    dispatcher: Dispatcher,
}

impl ToolSurface {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Tools that at least one enabled provider can answer.
    pub fn list(&self) -> Vec<ToolDefinition> {
        let registry = self.dispatcher.registry();

        TOOLS
            .iter()
            .filter_map(|tool| {
                let providers: Vec<_> = registry
                    .providers_for(tool.capability)
                    .map(|client| client.id())
                    .filter(|id| tool.provider.is_none_or(|pinned| pinned == *id))
                    .collect();
                (!providers.is_empty()).then(|| tool.definition(providers))
            })
            .collect()
    }

    /// Run a tool by name.
    #[instrument(skip(self, arguments))]
    pub async fn invoke(&self, name: &str, arguments: Value) -> Result<DispatchOutcome, ToolError> {
        let tool = find(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let mut params = parse_arguments(tool.capability, arguments)?;
        if let Some(provider) = tool.provider {
            if params.providers.is_some() {
                return Err(ToolError::InvalidArguments(format!(
                    "{name} always uses {provider}; `providers` is not accepted"
                )));
            }
            params.providers = Some(vec![provider]);
        }

        let request = UnifiedRequest::new(tool.capability, params);
        let outcome = self.dispatcher.dispatch(&request).await?;

        info!(
            results = outcome.results.len(),
            errors = outcome.errors.len(),
            "tool finished"
        );
        Ok(outcome)
    }
}
