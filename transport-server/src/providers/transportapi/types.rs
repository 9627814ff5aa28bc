//! TransportAPI response DTOs.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::providers::de;

/// Response from `/train/station/{CRS}/live.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveBoardResponse {
    /// Board date, local to the UK.
    pub date: Option<NaiveDate>,

    /// Local `HH:MM` the board was generated for.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub time_of_day: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub station_name: Option<String>,

    /// The board's CRS code.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub station_code: Option<String>,

    pub departures: Option<LiveDepartures>,
}

/// Departures wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveDepartures {
    #[serde(default)]
    pub all: Vec<LiveDeparture>,
}

/// One departure on a live board.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveDeparture {
    /// Timetabled local `HH:MM`.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub aimed_departure_time: Option<String>,

    /// Forecast local `HH:MM`; null when there is no forecast.
    #[serde(default, deserialize_with = "de::opt_string")]
    pub expected_departure_time: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub destination_name: Option<String>,

    #[serde(default, deserialize_with = "de::opt_string")]
    pub platform: Option<String>,

    /// Train operating company, e.g. "LNER".
    #[serde(default, deserialize_with = "de::opt_string")]
    pub operator_name: Option<String>,

    /// Service identifier, e.g. "24673105".
    #[serde(default, deserialize_with = "de::opt_string")]
    pub service: Option<String>,

    /// "ON TIME", "LATE", "CANCELLED", ...
    #[serde(default, deserialize_with = "de::opt_string")]
    pub status: Option<String>,
}

impl LiveDeparture {
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("cancelled"))
    }
}

/// Parsed TransportAPI response. Only live boards are fetched.
#[derive(Debug, Clone)]
pub enum TransportApiResponse {
    LiveBoard(LiveBoardResponse),
}
