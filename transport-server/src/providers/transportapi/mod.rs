//! UK National Rail live departures via transportapi.com.
//!
//! Key characteristics of the API:
//! - `app_id` and `app_key` query parameters on every request
//! - Stations are addressed by 3-letter CRS code
//! - Times are local `HH:MM` (Europe/London) with a separate board date

mod client;
mod convert;
mod crs;
mod types;

pub use client::{DEFAULT_BASE_URL, TransportApiClient, TransportApiConfig};
pub use convert::{convert_departure, convert_response};
pub use crs::{Crs, InvalidCrs};
pub use types::{LiveBoardResponse, LiveDeparture, LiveDepartures, TransportApiResponse};
