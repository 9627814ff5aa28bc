//! transport.opendata.ch HTTP client.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tracing::instrument;

use crate::domain::{
    Capability, Coordinates, DEFAULT_CONNECTIONS_LIMIT, DEFAULT_DEPARTURES_LIMIT,
    DEFAULT_STATIONS_LIMIT, ProviderId, QueryParams,
};
use crate::providers::http::{build_client, get_json};
use crate::providers::{ProviderClient, ProviderError, RawProviderResult};

use super::types::{ConnectionsResponse, LocationsResponse, OpendataResponse, StationboardResponse};

/// Default base URL for the Swiss transport API.
pub const DEFAULT_BASE_URL: &str = "https://transport.opendata.ch/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the opendata.ch client.
#[derive(Debug, Clone)]
pub struct OpendataConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpendataConfig {
    pub fn new() -> Self {
        Self {
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

impl Default for OpendataConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the Swiss public transport API. No authentication is needed.
#[derive(Debug, Clone)]
pub struct OpendataClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpendataClient {
    pub fn new(config: OpendataConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Departure board for a station name or id.
    ///
    /// `datetime` is local Swiss time; `None` means now.
    pub async fn stationboard(
        &self,
        station: &str,
        limit: u8,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    ) -> Result<StationboardResponse, ProviderError> {
        let url = format!("{}/stationboard", self.base_url);

        let mut query = vec![
            ("station", station.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(datetime) = board_datetime(date, time) {
            query.push(("datetime", datetime));
        }

        get_json(self.http.get(&url).query(&query)).await
    }

    /// Stations matching a free-text name.
    pub async fn locations_by_name(&self, name: &str) -> Result<LocationsResponse, ProviderError> {
        let url = format!("{}/locations", self.base_url);

        get_json(
            self.http
                .get(&url)
                .query(&[("query", name), ("type", "station")]),
        )
        .await
    }

    /// Stations around a coordinate, sorted by distance upstream.
    ///
    /// opendata.ch documents `x` as latitude and `y` as longitude.
    pub async fn locations_near(
        &self,
        position: Coordinates,
    ) -> Result<LocationsResponse, ProviderError> {
        let url = format!("{}/locations", self.base_url);

        get_json(self.http.get(&url).query(&[
            ("x", position.latitude.to_string()),
            ("y", position.longitude.to_string()),
            ("type", "station".to_string()),
        ]))
        .await
    }

    /// Connections between two stations.
    pub async fn connections(
        &self,
        origin: &str,
        destination: &str,
        limit: u8,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        arrive_by: bool,
    ) -> Result<ConnectionsResponse, ProviderError> {
        let url = format!("{}/connections", self.base_url);

        let mut query = vec![
            ("from", origin.to_string()),
            ("to", destination.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(date) = date {
            query.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(time) = time {
            query.push(("time", time.format("%H:%M").to_string()));
        }
        if arrive_by {
            query.push(("isArrivalTime", "1".to_string()));
        }

        get_json(self.http.get(&url).query(&query)).await
    }

    async fn nearby(&self, params: &QueryParams) -> Result<LocationsResponse, ProviderError> {
        let limit = usize::from(params.limit_or(DEFAULT_STATIONS_LIMIT));

        let mut response = match (params.coordinates(), params.station()) {
            (Some(position), _) => {
                let radius = f64::from(params.radius_m());
                let mut response = self.locations_near(position).await?;
                response
                    .stations
                    .retain(|s| s.distance.is_none_or(|d| d <= radius));
                response
            }
            (None, Some(name)) => self.locations_by_name(name).await?,
            (None, None) => {
                return Err(ProviderError::InvalidParams(
                    "coordinates or a station name are required".to_string(),
                ));
            }
        };

        response.stations.truncate(limit);
        Ok(response)
    }
}

/// opendata.ch wants `YYYY-MM-DD HH:MM`; a lone date means midnight, a lone
/// time means today.
fn board_datetime(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Option<String> {
    match (date, time) {
        (Some(d), Some(t)) => Some(format!("{} {}", d.format("%Y-%m-%d"), t.format("%H:%M"))),
        (Some(d), None) => Some(format!("{} 00:00", d.format("%Y-%m-%d"))),
        (None, Some(t)) => Some(t.format("%H:%M").to_string()),
        (None, None) => None,
    }
}

fn required<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str, ProviderError> {
    value.ok_or_else(|| ProviderError::InvalidParams(format!("{what} is required")))
}

#[async_trait]
impl ProviderClient for OpendataClient {
    fn id(&self) -> ProviderId {
        ProviderId::Ch
    }

    #[instrument(skip(self, params), fields(provider = "ch"))]
    async fn fetch(
        &self,
        capability: Capability,
        params: &QueryParams,
    ) -> Result<RawProviderResult, ProviderError> {
        let response = match capability {
            Capability::Departures => {
                let station = required(params.station(), "station")?;
                let limit = params.limit_or(DEFAULT_DEPARTURES_LIMIT);
                OpendataResponse::Stationboard(
                    self.stationboard(station, limit, params.date, params.time)
                        .await?,
                )
            }
            Capability::StationsNearby => OpendataResponse::Locations(self.nearby(params).await?),
            Capability::StationsSearch => {
                let name = required(params.station(), "station")?;
                let mut response = self.locations_by_name(name).await?;
                response
                    .stations
                    .truncate(usize::from(params.limit_or(DEFAULT_STATIONS_LIMIT)));
                OpendataResponse::Locations(response)
            }
            Capability::Connections => {
                let origin = required(params.origin(), "origin")?;
                let destination = required(params.destination(), "destination")?;
                OpendataResponse::Connections(
                    self.connections(
                        origin,
                        destination,
                        params.limit_or(DEFAULT_CONNECTIONS_LIMIT),
                        params.date,
                        params.time,
                        params.arrive_by,
                    )
                    .await?,
                )
            }
            Capability::Vehicle => return Err(ProviderError::Unsupported(capability)),
        };

        Ok(RawProviderResult::Opendata(response))
    }
}
