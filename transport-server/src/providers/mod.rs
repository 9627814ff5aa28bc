//! Upstream provider clients.
//!
//! One sub-module per upstream API, each laid out the same way:
//! - `client`: HTTP requests, auth, parameter mapping
//! - `types`: response DTOs mirroring the upstream JSON
//! - `convert`: DTO to [`UnifiedResult`](crate::domain::UnifiedResult) mapping
//!
//! Every client implements [`ProviderClient`], so the dispatcher can treat
//! them uniformly through a lookup table keyed by [`ProviderId`].

mod de;
mod error;
mod http;
pub mod irail;
pub mod opendata;
pub mod transportapi;

use async_trait::async_trait;

use crate::domain::{Capability, ProviderId, QueryParams};

pub use error::ProviderError;

/// A provider's parsed response, before normalisation.
///
/// Each variant is produced only by its own provider's client and consumed
/// only by that provider's converter.
#[derive(Debug, Clone)]
pub enum RawProviderResult {
    Opendata(opendata::OpendataResponse),
    Irail(irail::IrailResponse),
    TransportApi(transportapi::TransportApiResponse),
}

impl RawProviderResult {
    /// The provider that produced this result.
    pub fn provider(&self) -> ProviderId {
        match self {
            RawProviderResult::Opendata(_) => ProviderId::Ch,
            RawProviderResult::Irail(_) => ProviderId::Be,
            RawProviderResult::TransportApi(_) => ProviderId::Uk,
        }
    }
}

/// An upstream that can answer one or more capabilities.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Which provider this client talks to.
    fn id(&self) -> ProviderId;

    /// Capabilities this client answers. Defaults to the provider's table.
    fn capabilities(&self) -> &'static [Capability] {
        self.id().capabilities()
    }

    /// Fetch and parse the upstream response for `capability`.
    ///
    /// Parameters the upstream cannot use are rejected with
    /// [`ProviderError::InvalidParams`] before any request is sent.
    async fn fetch(
        &self,
        capability: Capability,
        params: &QueryParams,
    ) -> Result<RawProviderResult, ProviderError>;
}
