//! Unified requests and their validation.

use chrono::{NaiveDate, NaiveTime};

use super::{Capability, Coordinates, ProviderId};

/// Default number of departures per provider.
pub const DEFAULT_DEPARTURES_LIMIT: u8 = 10;

/// Default number of connections per provider.
pub const DEFAULT_CONNECTIONS_LIMIT: u8 = 4;

/// Default number of stations per provider.
pub const DEFAULT_STATIONS_LIMIT: u8 = 10;

/// Default search radius for nearby stations, in metres.
pub const DEFAULT_RADIUS_M: u32 = 1000;

/// Upper bound accepted for `limit`.
pub const MAX_LIMIT: u8 = 50;

/// Error returned when a request lacks the fields its capability needs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid parameters: {reason}")]
pub struct InvalidParams {
    reason: String,
}

impl InvalidParams {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Free-form query parameters shared by every capability.
///
/// Which fields are required depends on the capability; see
/// [`UnifiedRequest::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    /// Station name or id (departures, stations by name).
    pub station: Option<String>,
    /// Origin station (connections).
    pub origin: Option<String>,
    /// Destination station (connections).
    pub destination: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Search radius in metres (stations-nearby).
    pub radius_m: Option<u32>,
    /// Local date at the station.
    pub date: Option<NaiveDate>,
    /// Local time at the station.
    pub time: Option<NaiveTime>,
    /// Interpret `time` as the arrival time (connections).
    pub arrive_by: bool,
    /// Maximum number of records per provider.
    pub limit: Option<u8>,
    /// Vehicle id (vehicle).
    pub vehicle_id: Option<String>,
    /// Restrict the fan-out to these providers.
    pub providers: Option<Vec<ProviderId>>,
}

impl QueryParams {
    /// Trimmed station, if present and non-empty.
    pub fn station(&self) -> Option<&str> {
        non_empty(self.station.as_deref())
    }

    /// Trimmed origin, if present and non-empty.
    pub fn origin(&self) -> Option<&str> {
        non_empty(self.origin.as_deref())
    }

    /// Trimmed destination, if present and non-empty.
    pub fn destination(&self) -> Option<&str> {
        non_empty(self.destination.as_deref())
    }

    /// Trimmed vehicle id, if present and non-empty.
    pub fn vehicle_id(&self) -> Option<&str> {
        non_empty(self.vehicle_id.as_deref())
    }

    /// The query position, if both coordinates are present and valid.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::new(self.latitude?, self.longitude?)
    }

    /// The requested limit, or `default` when unset.
    pub fn limit_or(&self, default: u8) -> u8 {
        self.limit.unwrap_or(default)
    }

    /// The requested radius, or [`DEFAULT_RADIUS_M`] when unset.
    pub fn radius_m(&self) -> u32 {
        self.radius_m.unwrap_or(DEFAULT_RADIUS_M)
    }

    /// Whether `provider` passes the optional provider filter.
    pub fn allows(&self, provider: ProviderId) -> bool {
        self.providers
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&provider))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// A capability plus its parameters. Created once per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRequest {
    pub capability: Capability,
    pub params: QueryParams,
}

impl UnifiedRequest {
    pub fn new(capability: Capability, params: QueryParams) -> Self {
        Self { capability, params }
    }

    /// Check that the parameters carry what the capability needs.
    ///
    /// Runs before any provider is selected, so a failure here never
    /// reaches the network.
    pub fn validate(&self) -> Result<(), InvalidParams> {
        let p = &self.params;

        if let Some(limit) = p.limit {
            if limit == 0 || limit > MAX_LIMIT {
                return Err(InvalidParams::new(format!(
                    "limit must be between 1 and {MAX_LIMIT}"
                )));
            }
        }

        match self.capability {
            Capability::Departures => {
                p.station()
                    .ok_or_else(|| InvalidParams::new("departures require a station"))?;
            }
            Capability::StationsSearch => {
                p.station()
                    .ok_or_else(|| InvalidParams::new("station search requires a query"))?;
            }
            Capability::StationsNearby => validate_nearby(p)?,
            Capability::Connections => {
                let origin = p
                    .origin()
                    .ok_or_else(|| InvalidParams::new("connections require an origin"))?;
                let destination = p
                    .destination()
                    .ok_or_else(|| InvalidParams::new("connections require a destination"))?;
                if origin.eq_ignore_ascii_case(destination) {
                    return Err(InvalidParams::new(
                        "origin and destination must be different",
                    ));
                }
            }
            Capability::Vehicle => {
                p.vehicle_id()
                    .ok_or_else(|| InvalidParams::new("vehicle lookup requires a vehicle id"))?;
            }
        }

        Ok(())
    }
}

fn validate_nearby(p: &QueryParams) -> Result<(), InvalidParams> {
    match (p.latitude, p.longitude) {
        (Some(lat), Some(lon)) => {
            if Coordinates::new(lat, lon).is_none() {
                return Err(InvalidParams::new(format!(
                    "coordinates out of range: {lat}, {lon}"
                )));
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(InvalidParams::new(
                "latitude and longitude must be given together",
            ));
        }
        (None, None) => {
            if p.station().is_none() {
                return Err(InvalidParams::new(
                    "nearby stations require coordinates or a station name",
                ));
            }
        }
    }

    if p.radius_m == Some(0) {
        return Err(InvalidParams::new("radius must be positive"));
    }

    Ok(())
}
