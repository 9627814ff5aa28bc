//! Request fan-out and fan-in.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::config::{AppConfig, DEFAULT_DISPATCH_DEADLINE_SECS};
use crate::domain::{
    Capability, DispatchOutcome, ErrorKind, ErrorRecord, InvalidParams, ProviderId, QueryParams,
    UnifiedRequest,
};
use crate::normalize::{ConversionError, normalize};
use crate::providers::{ProviderClient, ProviderError, RawProviderResult};

use super::merge::merge;
use super::registry::ProviderRegistry;

/// Errors that abort a whole request.
///
/// Everything else is reported per provider in
/// [`DispatchOutcome::errors`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The request lacks what its capability needs.
    #[error(transparent)]
    InvalidParams(#[from] InvalidParams),

    /// No enabled (and allowed) provider supports the capability.
    #[error("no available provider supports {0}")]
    UnsupportedCapability(Capability),
}

/// Dispatcher settings.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// How long one provider may take in total. A provider that overruns
    /// is reported as unavailable.
    pub provider_deadline: Duration,
}

impl DispatchConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            provider_deadline: config.dispatch_deadline(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            provider_deadline: Duration::from_secs(DEFAULT_DISPATCH_DEADLINE_SECS),
        }
    }
}

/// Routes a [`UnifiedRequest`] to every provider that can answer it.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ProviderRegistry>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(registry: ProviderRegistry, config: DispatchConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Answer a request from every selected provider.
    ///
    /// 1. Validate the parameters (no provider is contacted on failure).
    /// 2. Select enabled providers supporting the capability, narrowed by
    ///    the request's provider filter.
    /// 3. Fetch from all of them concurrently, each bounded by the
    ///    provider deadline.
    /// 4. Normalise successes, record failures, and merge.
    ///
    /// One provider failing never affects the others. Dropping the returned
    /// future abandons every in-flight upstream call.
    #[instrument(skip(self, request), fields(capability = %request.capability))]
    pub async fn dispatch(&self, request: &UnifiedRequest) -> Result<DispatchOutcome, DispatchError> {
        request.validate()?;

        let capability = request.capability;
        let params = &request.params;

        let selected: Vec<Arc<dyn ProviderClient>> = self
            .registry
            .providers_for(capability)
            .filter(|client| params.allows(client.id()))
            .cloned()
            .collect();

        if selected.is_empty() {
            return Err(DispatchError::UnsupportedCapability(capability));
        }

        debug!(
            providers = ?selected.iter().map(|c| c.id()).collect::<Vec<_>>(),
            "dispatching"
        );

        // join_all yields in input order, which is provider id order
        let outcomes = join_all(
            selected
                .iter()
                .map(|client| self.fetch_one(client.as_ref(), capability, params)),
        )
        .await;

        let mut batches = Vec::with_capacity(outcomes.len());
        let mut errors = Vec::new();

        for (provider, outcome) in outcomes {
            match outcome {
                Ok(raw) => {
                    let normalized = normalize(&raw);
                    if let Some(record) = dropped_record(provider, capability, &normalized.dropped)
                    {
                        errors.push(record);
                    }
                    batches.push(normalized.results);
                }
                Err(e) => {
                    warn!(provider = %provider, capability = %capability, error = %e, "provider failed");
                    if let Some(body) = e.body_excerpt() {
                        debug!(provider = %provider, body, "undecodable upstream body");
                    }
                    errors.push(ErrorRecord::new(provider, capability, e.kind(), e.to_string()));
                }
            }
        }

        Ok(DispatchOutcome {
            results: merge(capability, batches),
            errors,
        })
    }

    async fn fetch_one(
        &self,
        client: &dyn ProviderClient,
        capability: Capability,
        params: &QueryParams,
    ) -> (ProviderId, Result<RawProviderResult, ProviderError>) {
        let provider = client.id();
        let deadline = self.config.provider_deadline;

        let outcome = match tokio::time::timeout(deadline, client.fetch(capability, params)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ProviderError::UpstreamUnavailable(format!(
                "no answer within {}s",
                deadline.as_secs_f64()
            ))),
        };

        (provider, outcome)
    }
}

/// One error record summarising the records a provider sent that could not
/// be converted.
fn dropped_record(
    provider: ProviderId,
    capability: Capability,
    dropped: &[ConversionError],
) -> Option<ErrorRecord> {
    let first = dropped.first()?;
    debug!(provider = %provider, count = dropped.len(), first = %first, "dropped upstream records");

    Some(ErrorRecord::new(
        provider,
        capability,
        ErrorKind::MalformedUpstreamData,
        format!("dropped {} malformed record(s); first: {first}", dropped.len()),
    ))
}
