//! Provider lookup table.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{Capability, ProviderId};
use crate::providers::irail::{IrailClient, IrailConfig};
use crate::providers::opendata::{OpendataClient, OpendataConfig};
use crate::providers::transportapi::{TransportApiClient, TransportApiConfig};
use crate::providers::{ProviderClient, ProviderError};

/// Which providers are enabled, and the client behind each.
///
/// Built once at startup and never mutated afterwards. Iteration is always
/// in [`ProviderId`] order.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    clients: BTreeMap<ProviderId, Arc<dyn ProviderClient>>,
    disabled: BTreeMap<ProviderId, String>,
}

/// A provider's availability, as reported on `/providers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub id: ProviderId,
    pub country: &'static str,
    pub enabled: bool,
    pub capabilities: Vec<Capability>,
    pub reason: Option<String>,
}

impl ProviderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under its own id, replacing any previous one.
    pub fn register(&mut self, client: Arc<dyn ProviderClient>) {
        let id = client.id();
        self.disabled.remove(&id);
        self.clients.insert(id, client);
    }

    /// Mark a provider as disabled.
    pub fn disable(&mut self, id: ProviderId, reason: impl Into<String>) {
        self.clients.remove(&id);
        self.disabled.insert(id, reason.into());
    }

    /// Build every provider the configuration allows.
    ///
    /// A provider whose client cannot be built is disabled rather than
    /// failing startup.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut registry = Self::new();
        let timeout = config.upstream_timeout_secs;

        registry.enable_or_disable(
            ProviderId::Ch,
            OpendataClient::new(
                OpendataConfig::new()
                    .with_base_url(&config.ch_base_url)
                    .with_timeout(timeout),
            ),
        );
        registry.enable_or_disable(
            ProviderId::Be,
            IrailClient::new(
                IrailConfig::new()
                    .with_base_url(&config.be_base_url)
                    .with_timeout(timeout),
            ),
        );

        match &config.uk_credentials {
            Some(credentials) => registry.enable_or_disable(
                ProviderId::Uk,
                TransportApiClient::new(
                    TransportApiConfig::new(&credentials.app_id, &credentials.app_key)
                        .with_base_url(&config.uk_base_url)
                        .with_timeout(timeout),
                ),
            ),
            None => {
                let reason = config.uk_disabled_reason().unwrap_or("not configured");
                warn!(provider = %ProviderId::Uk, reason, "provider disabled");
                registry.disable(ProviderId::Uk, reason);
            }
        }

        registry
    }

    fn enable_or_disable<C>(&mut self, id: ProviderId, client: Result<C, ProviderError>)
    where
        C: ProviderClient + 'static,
    {
        match client {
            Ok(client) => {
                info!(provider = %id, "provider enabled");
                self.register(Arc::new(client));
            }
            Err(e) => {
                warn!(provider = %id, error = %e, "provider disabled");
                self.disable(id, e.to_string());
            }
        }
    }

    /// Whether a provider has a client.
    pub fn is_available(&self, id: ProviderId) -> bool {
        self.clients.contains_key(&id)
    }

    /// Enabled providers, in id order.
    pub fn enabled(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.clients.keys().copied()
    }

    /// Enabled clients supporting `capability`, in id order.
    pub fn providers_for(
        &self,
        capability: Capability,
    ) -> impl Iterator<Item = &Arc<dyn ProviderClient>> + '_ {
        self.clients
            .values()
            .filter(move |client| client.capabilities().contains(&capability))
    }

    /// Whether any enabled provider supports `capability`.
    pub fn supports(&self, capability: Capability) -> bool {
        self.providers_for(capability).next().is_some()
    }

    /// Status of every known provider, enabled or not.
    pub fn statuses(&self) -> Vec<ProviderStatus> {
        ProviderId::ALL
            .iter()
            .map(|&id| {
                let client = self.clients.get(&id);
                let capabilities = client
                    .map_or_else(|| id.capabilities(), |c| c.capabilities())
                    .to_vec();
                ProviderStatus {
                    id,
                    country: id.country(),
                    enabled: client.is_some(),
                    capabilities,
                    reason: match client {
                        Some(_) => None,
                        None => Some(
                            self.disabled
                                .get(&id)
                                .cloned()
                                .unwrap_or_else(|| "not registered".to_string()),
                        ),
                    },
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("enabled", &self.clients.keys().collect::<Vec<_>>())
            .field("disabled", &self.disabled)
            .finish()
    }
}
