//! Belgian railways (NMBS/SNCB) via api.irail.be.
//!
//! Key characteristics of the API:
//! - No authentication; `format=json` must be requested explicitly
//! - Times are Unix epoch seconds, delays are seconds
//! - Nearly every scalar arrives as a JSON string
//! - Dates are `DDMMYY`, times `HHMM`

mod client;
mod convert;
mod types;

pub use client::{DEFAULT_BASE_URL, IrailClient, IrailConfig};
pub use convert::{convert_connection, convert_response, convert_station};
pub use types::{
    Connection, ConnectionsResponse, Departures, Direction, IrailResponse, LiveboardResponse,
    NearbyStation, StationInfo, StationsResponse, Stop, VehicleInfo, VehicleResponse,
    VehicleStops,
};
