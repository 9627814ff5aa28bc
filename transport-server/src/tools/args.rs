//! Typed tool arguments.
//!
//! One struct per capability. Fields the capability requires are still
//! `Option` here: presence is checked by
//! [`UnifiedRequest::validate`](crate::domain::UnifiedRequest::validate) so
//! every entry point reports missing fields the same way.
//!
//! Aliases keep the argument names of the earlier per-country tools working
//! (`query`, `station_code`, `is_arrival_time`, `results`, `distance`).

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{Capability, ProviderId, QueryParams};

use super::ToolError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeparturesArgs {
    #[serde(alias = "station_code")]
    pub station: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub limit: Option<u8>,
    pub providers: Option<Vec<ProviderId>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NearbyArgs {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub station: Option<String>,
    #[serde(alias = "distance")]
    pub radius_m: Option<u32>,
    pub limit: Option<u8>,
    pub providers: Option<Vec<ProviderId>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionsArgs {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    #[serde(default, alias = "is_arrival_time")]
    pub arrive_by: bool,
    #[serde(alias = "results")]
    pub limit: Option<u8>,
    pub providers: Option<Vec<ProviderId>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationSearchArgs {
    #[serde(alias = "station")]
    pub query: Option<String>,
    pub limit: Option<u8>,
    pub providers: Option<Vec<ProviderId>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleArgs {
    #[serde(alias = "id")]
    pub vehicle_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub providers: Option<Vec<ProviderId>>,
}

impl DeparturesArgs {
    fn into_params(self) -> Result<QueryParams, ToolError> {
        Ok(QueryParams {
            station: self.station,
            date: self.date,
            time: parse_time(self.time.as_deref())?,
            limit: self.limit,
            providers: self.providers,
            ..QueryParams::default()
        })
    }
}

impl NearbyArgs {
    fn into_params(self) -> QueryParams {
        QueryParams {
            latitude: self.latitude,
            longitude: self.longitude,
            station: self.station,
            radius_m: self.radius_m,
            limit: self.limit,
            providers: self.providers,
            ..QueryParams::default()
        }
    }
}

impl ConnectionsArgs {
    fn into_params(self) -> Result<QueryParams, ToolError> {
        Ok(QueryParams {
            origin: self.origin,
            destination: self.destination,
            date: self.date,
            time: parse_time(self.time.as_deref())?,
            arrive_by: self.arrive_by,
            limit: self.limit,
            providers: self.providers,
            ..QueryParams::default()
        })
    }
}

impl StationSearchArgs {
    fn into_params(self) -> QueryParams {
        QueryParams {
            station: self.query,
            limit: self.limit,
            providers: self.providers,
            ..QueryParams::default()
        }
    }
}

impl VehicleArgs {
    fn into_params(self) -> QueryParams {
        QueryParams {
            vehicle_id: self.vehicle_id,
            date: self.date,
            providers: self.providers,
            ..QueryParams::default()
        }
    }
}

/// Decode a tool's JSON arguments into query parameters for `capability`.
///
/// `null` is accepted as "no arguments".
pub fn parse_arguments(capability: Capability, arguments: Value) -> Result<QueryParams, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };

    match capability {
        Capability::Departures => decode::<DeparturesArgs>(arguments)?.into_params(),
        Capability::StationsNearby => Ok(decode::<NearbyArgs>(arguments)?.into_params()),
        Capability::Connections => decode::<ConnectionsArgs>(arguments)?.into_params(),
        Capability::StationsSearch => Ok(decode::<StationSearchArgs>(arguments)?.into_params()),
        Capability::Vehicle => Ok(decode::<VehicleArgs>(arguments)?.into_params()),
    }
}

fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// `HH:MM`, with optional seconds.
fn parse_time(time: Option<&str>) -> Result<Option<NaiveTime>, ToolError> {
    let Some(time) = time.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map(Some)
        .map_err(|_| ToolError::InvalidArguments(format!("time must be HH:MM, got {time:?}")))
}
