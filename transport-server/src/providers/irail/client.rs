//! iRail HTTP client.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, instrument};

use crate::domain::{
    Capability, Coordinates, DEFAULT_CONNECTIONS_LIMIT, DEFAULT_DEPARTURES_LIMIT,
    DEFAULT_STATIONS_LIMIT, ProviderId, QueryParams,
};
use crate::providers::http::{build_client, get_json};
use crate::providers::{ProviderClient, ProviderError, RawProviderResult};

use super::types::{
    ConnectionsResponse, IrailResponse, LiveboardResponse, NearbyStation, StationInfo,
    StationsResponse, VehicleResponse,
};

/// Default base URL for the iRail API.
pub const DEFAULT_BASE_URL: &str = "https://api.irail.be";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the iRail client.
#[derive(Debug, Clone)]
pub struct IrailConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl IrailConfig {
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

impl Default for IrailConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the Belgian railway API.
///
/// iRail has no proximity or free-text station search, so both are served
/// by fetching the full station list and filtering it locally.
#[derive(Debug, Clone)]
pub struct IrailClient {
    http: reqwest::Client,
    base_url: String,
}

impl IrailClient {
    pub fn new(config: IrailConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Departures from a station, by name or iRail id.
    pub async fn liveboard(
        &self,
        station: &str,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    ) -> Result<LiveboardResponse, ProviderError> {
        let url = format!("{}/liveboard/", self.base_url);

        let mut query = base_query();
        let key = if station.starts_with("BE.NMBS.") { "id" } else { "station" };
        query.push((key, station.to_string()));
        query.push(("arrdep", "departure".to_string()));
        push_date_time(&mut query, date, time);

        get_json(self.http.get(&url).query(&query)).await
    }

    /// The complete NMBS/SNCB station list.
    pub async fn stations(&self) -> Result<StationsResponse, ProviderError> {
        let url = format!("{}/stations/", self.base_url);
        get_json(self.http.get(&url).query(&base_query())).await
    }

    /// Connections between two stations.
    pub async fn connections(
        &self,
        origin: &str,
        destination: &str,
        results: u8,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        arrive_by: bool,
    ) -> Result<ConnectionsResponse, ProviderError> {
        let url = format!("{}/connections/", self.base_url);

        let mut query = base_query();
        query.push(("from", origin.to_string()));
        query.push(("to", destination.to_string()));
        query.push(("results", results.to_string()));
        let timesel = if arrive_by { "arrival" } else { "departure" };
        query.push(("timesel", timesel.to_string()));
        push_date_time(&mut query, date, time);

        get_json(self.http.get(&url).query(&query)).await
    }

    /// Stops of one vehicle, e.g. "BE.NMBS.IC1832" or "IC1832".
    pub async fn vehicle(
        &self,
        id: &str,
        date: Option<NaiveDate>,
    ) -> Result<VehicleResponse, ProviderError> {
        let url = format!("{}/vehicle/", self.base_url);

        let mut query = base_query();
        query.push(("id", id.to_string()));
        push_date_time(&mut query, date, None);

        get_json(self.http.get(&url).query(&query)).await
    }

    async fn departures(&self, params: &QueryParams) -> Result<LiveboardResponse, ProviderError> {
        let station = required(params.station(), "station")?;
        let mut board = self.liveboard(station, params.date, params.time).await?;
        if let Some(departures) = board.departures.as_mut() {
            departures
                .departure
                .truncate(usize::from(params.limit_or(DEFAULT_DEPARTURES_LIMIT)));
        }
        Ok(board)
    }

    async fn nearby(&self, params: &QueryParams) -> Result<IrailResponse, ProviderError> {
        let limit = usize::from(params.limit_or(DEFAULT_STATIONS_LIMIT));

        match (params.coordinates(), params.station()) {
            (Some(position), _) => {
                let stations = self.stations().await?.station;
                let radius = f64::from(params.radius_m());
                Ok(IrailResponse::NearbyStations(nearby_stations(
                    stations, position, radius, limit,
                )))
            }
            (None, Some(name)) => {
                let stations = self.stations().await?.station;
                Ok(IrailResponse::Stations(matching_stations(stations, name, limit)))
            }
            (None, None) => Err(ProviderError::InvalidParams(
                "coordinates or a station name are required".to_string(),
            )),
        }
    }
}

/// Parameters sent on every request.
fn base_query() -> Vec<(&'static str, String)> {
    vec![
        ("format", "json".to_string()),
        ("lang", "en".to_string()),
    ]
}

/// iRail wants `DDMMYY` and `HHMM`.
fn push_date_time(
    query: &mut Vec<(&'static str, String)>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) {
    if let Some(date) = date {
        query.push(("date", date.format("%d%m%y").to_string()));
    }
    if let Some(time) = time {
        query.push(("time", time.format("%H%M").to_string()));
    }
}

fn required<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str, ProviderError> {
    value.ok_or_else(|| ProviderError::InvalidParams(format!("{what} is required")))
}

/// Stations within `radius_m` of `position`, nearest first.
///
/// Stations without usable coordinates are skipped.
pub(crate) fn nearby_stations(
    stations: Vec<StationInfo>,
    position: Coordinates,
    radius_m: f64,
    limit: usize,
) -> Vec<NearbyStation> {
    let mut nearby: Vec<NearbyStation> = stations
        .into_iter()
        .filter_map(|station| {
            let at = Coordinates::new(station.location_y?, station.location_x?)?;
            let distance_m = position.distance_m(&at);
            (distance_m <= radius_m).then_some(NearbyStation { station, distance_m })
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    nearby.truncate(limit);
    debug!(count = nearby.len(), "stations within radius");
    nearby
}

/// Stations whose name contains `query`, case-insensitively, in list order.
pub(crate) fn matching_stations(
    stations: Vec<StationInfo>,
    query: &str,
    limit: usize,
) -> Vec<StationInfo> {
    let needle = query.to_lowercase();
    let matches = |name: &Option<String>| {
        name.as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&needle))
    };

    stations
        .into_iter()
        .filter(|s| matches(&s.name) || matches(&s.standardname))
        .take(limit)
        .collect()
}

#[async_trait]
impl ProviderClient for IrailClient {
    fn id(&self) -> ProviderId {
        ProviderId::Be
    }

    #[instrument(skip(self, params), fields(provider = "be"))]
    async fn fetch(
        &self,
        capability: Capability,
        params: &QueryParams,
    ) -> Result<RawProviderResult, ProviderError> {
        let response = match capability {
            Capability::Departures => IrailResponse::Liveboard(self.departures(params).await?),
            Capability::StationsNearby => self.nearby(params).await?,
            Capability::StationsSearch => {
                let name = required(params.station(), "station")?;
                let stations = self.stations().await?.station;
                IrailResponse::Stations(matching_stations(
                    stations,
                    name,
                    usize::from(params.limit_or(DEFAULT_STATIONS_LIMIT)),
                ))
            }
            Capability::Connections => {
                let origin = required(params.origin(), "origin")?;
                let destination = required(params.destination(), "destination")?;
                let limit = params.limit_or(DEFAULT_CONNECTIONS_LIMIT);
                let mut response = self
                    .connections(
                        origin,
                        destination,
                        limit,
                        params.date,
                        params.time,
                        params.arrive_by,
                    )
                    .await?;
                // `results` is a hint; iRail may return more
                response.connection.truncate(usize::from(limit));
                IrailResponse::Connections(response)
            }
            Capability::Vehicle => {
                let id = required(params.vehicle_id(), "vehicle_id")?;
                IrailResponse::Vehicle(self.vehicle(id, params.date).await?)
            }
        };

        Ok(RawProviderResult::Irail(response))
    }
}
