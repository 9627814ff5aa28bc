//! Swiss public transport via transport.opendata.ch.
//!
//! Key characteristics of the API:
//! - No authentication
//! - Times are ISO 8601 with a compact `+0100` offset
//! - `prognosis` carries real-time data and is `null` when there is none
//! - WGS84 coordinates use `x` for latitude and `y` for longitude

mod client;
mod convert;
mod types;

pub use client::{DEFAULT_BASE_URL, OpendataClient, OpendataConfig};
pub use convert::{convert_connection, convert_departure, convert_location, convert_response};
pub use types::{
    Checkpoint, Connection, ConnectionsResponse, Coordinate, Location, LocationsResponse,
    OpendataResponse, Prognosis, Section, SectionJourney, StationboardEntry, StationboardResponse,
};
