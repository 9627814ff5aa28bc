//! transport.opendata.ch response DTOs.
//!
//! These map directly to the v1 JSON API. Fields are optional wherever the
//! API is known to send `null` (e.g. `prognosis` members before real-time
//! data is available, coordinates of some bus stops).

use serde::Deserialize;

use crate::providers::de;

/// Response from `/stationboard`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationboardResponse {
    /// The board's station.
    pub station: Option<Location>,

    /// Departures, in upstream (chronological) order.
    #[serde(default)]
    pub stationboard: Vec<StationboardEntry>,
}

/// One departure on a station board.
#[derive(Debug, Clone, Deserialize)]
pub struct StationboardEntry {
    /// Times at the board station. Absent on broken entries, which the
    /// converter drops.
    pub stop: Option<Checkpoint>,

    /// Journey name, e.g. "IC 1 712".
    #[serde(default, deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    /// Category, e.g. "IC", "S", "B".
    #[serde(default, deserialize_with = "de::opt_string")]
    pub category: Option<String>,

    /// Line number within the category.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub number: Option<String>,

    /// Terminus of the journey.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub to: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub operator: Option<String>,
}

/// A station, address or POI.
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    pub coordinate: Option<Coordinate>,

    /// Distance from the query point in metres (coordinate queries only).
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub distance: Option<f64>,
}

/// opendata.ch coordinate. For WGS84, `x` is latitude and `y` is longitude.
#[derive(Debug, Clone, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "type")]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "de::opt_f64")]
    pub x: Option<f64>,

    #[serde(default, deserialize_with = "de::opt_f64")]
    pub y: Option<f64>,
}

/// Arrival/departure at one station, with real-time prognosis.
#[derive(Debug, Clone, Deserialize)]
pub struct Checkpoint {
    pub station: Option<Location>,

    /// Scheduled arrival (ISO 8601 with offset).
    pub arrival: Option<String>,

    /// Scheduled departure (ISO 8601 with offset).
    pub departure: Option<String>,

    /// Delay in minutes as reported upstream.
    #[serde(default, deserialize_with = "de::opt_i64")]
    pub delay: Option<i64>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub platform: Option<String>,

    pub prognosis: Option<Prognosis>,
}

/// Real-time forecast for a checkpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Prognosis {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub platform: Option<String>,

    pub arrival: Option<String>,

    pub departure: Option<String>,
}

/// Response from `/locations`.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationsResponse {
    #[serde(default)]
    pub stations: Vec<Location>,
}

/// Response from `/connections`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionsResponse {
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// One journey option between two stations.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
    pub from: Option<Checkpoint>,

    pub to: Option<Checkpoint>,

    /// Duration as "00d01:02:00".
    pub duration: Option<String>,

    #[serde(default, deserialize_with = "de::opt_i64")]
    pub transfers: Option<i64>,

    #[serde(default)]
    pub sections: Vec<Section>,
}

/// A leg of a connection; walks have no journey.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub journey: Option<SectionJourney>,
}

/// The vehicle journey travelled on in a section.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionJourney {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub category: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub number: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub to: Option<String>,
}

/// Parsed opendata.ch response, one variant per endpoint.
#[derive(Debug, Clone)]
pub enum OpendataResponse {
    Stationboard(StationboardResponse),
    Locations(LocationsResponse),
    Connections(ConnectionsResponse),
}
