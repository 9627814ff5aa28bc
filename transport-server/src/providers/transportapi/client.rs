//! TransportAPI HTTP client.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::{Capability, DEFAULT_DEPARTURES_LIMIT, ProviderId, QueryParams};
use crate::providers::http::{build_client, get_json};
use crate::providers::{ProviderClient, ProviderError, RawProviderResult};

use super::crs::Crs;
use super::types::{LiveBoardResponse, TransportApiResponse};

/// Default base URL for the UK API.
pub const DEFAULT_BASE_URL: &str = "https://transportapi.com/v3/uk";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the TransportAPI client.
#[derive(Clone)]
pub struct TransportApiConfig {
    /// Application id issued by TransportAPI
    pub app_id: String,
    /// Application key issued by TransportAPI
    pub app_key: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransportApiConfig {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl fmt::Debug for TransportApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportApiConfig")
            .field("app_id", &self.app_id)
            .field("app_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Client for UK National Rail live departures.
#[derive(Debug, Clone)]
pub struct TransportApiClient {
    http: reqwest::Client,
    config: TransportApiConfig,
}

impl TransportApiClient {
    pub fn new(mut config: TransportApiConfig) -> Result<Self, ProviderError> {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            http: build_client(config.timeout_secs)?,
            config,
        })
    }

    /// Live departure board for a station.
    pub async fn live_departures(&self, crs: Crs) -> Result<LiveBoardResponse, ProviderError> {
        let url = format!("{}/train/station/{}/live.json", self.config.base_url, crs);

        get_json(self.http.get(&url).query(&[
            ("app_id", self.config.app_id.as_str()),
            ("app_key", self.config.app_key.as_str()),
            ("train_status", "passenger"),
        ]))
        .await
    }
}

#[async_trait]
impl ProviderClient for TransportApiClient {
    fn id(&self) -> ProviderId {
        ProviderId::Uk
    }

    #[instrument(skip(self, params), fields(provider = "uk"))]
    async fn fetch(
        &self,
        capability: Capability,
        params: &QueryParams,
    ) -> Result<RawProviderResult, ProviderError> {
        if capability != Capability::Departures {
            return Err(ProviderError::Unsupported(capability));
        }

        let station = params
            .station()
            .ok_or_else(|| ProviderError::InvalidParams("station is required".to_string()))?;
        let crs = Crs::parse_normalized(station)
            .map_err(|e| ProviderError::InvalidParams(e.to_string()))?;

        if params.date.is_some() || params.time.is_some() {
            debug!("live board ignores date and time");
        }

        let mut board = self.live_departures(crs).await?;
        if let Some(departures) = board.departures.as_mut() {
            departures
                .all
                .truncate(usize::from(params.limit_or(DEFAULT_DEPARTURES_LIMIT)));
        }

        Ok(RawProviderResult::TransportApi(TransportApiResponse::LiveBoard(board)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> TransportApiClient {
        TransportApiClient::new(
            TransportApiConfig::new("id", "key").with_base_url("http://127.0.0.1:1/"),
        )
        .unwrap()
    }

    #[test]
    fn config_builder() {
        let config = TransportApiConfig::new("id", "secret")
            .with_base_url("http://localhost:8080")
            .with_timeout(3);

        assert_eq!(config.app_id, "id");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn debug_redacts_key() {
        let config = TransportApiConfig::new("id", "secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn trailing_slash_stripped() {
        assert_eq!(offline_client().config.base_url, "http://127.0.0.1:1");
    }

    #[tokio::test]
    async fn station_name_is_not_a_crs() {
        let params = QueryParams {
            station: Some("London Kings Cross".to_string()),
            ..QueryParams::default()
        };
        let err = offline_client()
            .fetch(Capability::Departures, &params)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn only_departures_supported() {
        let err = offline_client()
            .fetch(Capability::Connections, &QueryParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unsupported(Capability::Connections)));
    }
}
