//! iRail API response DTOs.
//!
//! iRail sends nearly every scalar as a string (`"delay": "120"`,
//! `"canceled": "0"`, `"locationX": "4.356801"`), so the lenient
//! deserialisers from `providers::de` are used throughout.

use serde::Deserialize;

use crate::providers::de;

/// Station description attached to most iRail records.
#[derive(Debug, Clone, Deserialize)]
pub struct StationInfo {
    /// iRail id, e.g. "BE.NMBS.008892007".
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,

    /// Localised name.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    /// Name in the station's own language.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub standardname: Option<String>,

    /// Longitude.
    #[serde(default, rename = "locationX", deserialize_with = "de::opt_f64")]
    pub location_x: Option<f64>,

    /// Latitude.
    #[serde(default, rename = "locationY", deserialize_with = "de::opt_f64")]
    pub location_y: Option<f64>,
}

/// Vehicle description, e.g. shortname "IC 1832".
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleInfo {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub shortname: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub number: Option<String>,

    #[serde(default, rename = "type", deserialize_with = "de::opt_string")]
    pub kind: Option<String>,
}

/// Headsign of a connection leg.
#[derive(Debug, Clone, Deserialize)]
pub struct Direction {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub name: Option<String>,
}

/// A timed stop. Used for liveboard departures, connection endpoints and
/// vehicle stops.
///
/// On a liveboard `station` is the train's destination; everywhere else it
/// is the stop itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Stop {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub station: Option<String>,

    pub stationinfo: Option<StationInfo>,

    /// Scheduled time, Unix epoch seconds.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub time: Option<String>,

    /// Delay in seconds.
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub delay: Option<i64>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub platform: Option<String>,

    /// Vehicle id, e.g. "BE.NMBS.IC1832".
    #[serde(default, deserialize_with = "de::opt_string")]
    pub vehicle: Option<String>,

    pub vehicleinfo: Option<VehicleInfo>,

    #[serde(default, deserialize_with = "de::flag")]
    pub canceled: bool,

    pub direction: Option<Direction>,
}

/// Response from `/liveboard/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveboardResponse {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub station: Option<String>,

    pub stationinfo: Option<StationInfo>,

    pub departures: Option<Departures>,
}

/// Liveboard departures wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Departures {
    #[serde(default)]
    pub departure: Vec<Stop>,
}

/// Response from `/stations/`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationsResponse {
    #[serde(default)]
    pub station: Vec<StationInfo>,
}

/// Response from `/connections/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionsResponse {
    #[serde(default)]
    pub connection: Vec<Connection>,
}

/// One journey option.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    pub departure: Option<Stop>,

    pub arrival: Option<Stop>,

    /// Duration in seconds.
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub duration: Option<i64>,
}

/// Response from `/vehicle/`.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleResponse {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub vehicle: Option<String>,

    pub vehicleinfo: Option<VehicleInfo>,

    pub stops: Option<VehicleStops>,
}

/// Vehicle stops wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleStops {
    #[serde(default)]
    pub stop: Vec<Stop>,
}

/// A station with its distance from the query point.
#[derive(Debug, Clone)]
pub struct NearbyStation {
    pub station: StationInfo,
    pub distance_m: f64,
}

/// Parsed iRail response, one variant per endpoint.
#[derive(Debug, Clone)]
pub enum IrailResponse {
    Liveboard(LiveboardResponse),
    /// Name matches from the station list.
    Stations(Vec<StationInfo>),
    /// Stations within a radius, nearest first.
    NearbyStations(Vec<NearbyStation>),
    Connections(ConnectionsResponse),
    Vehicle(VehicleResponse),
}
