//! Conversion from TransportAPI DTOs to unified results.
//!
//! Field mapping (live board):
//!
//! | unified          | source                                         |
//! |------------------|------------------------------------------------|
//! | `stop_name`      | `station_name`                                 |
//! | `stop_id`        | `station_code`                                 |
//! | `scheduled_time` | `date` + `aimed_departure_time`, Europe/London |
//! | `actual_time`    | `date` + `expected_departure_time`             |
//! | `line_name`      | `operator_name`, else `service`                |
//! | `direction`      | `destination_name`                             |
//! | `platform`       | `platform`                                     |
//! | `cancelled`      | `status == "CANCELLED"`                        |
//!
//! The board only carries local `HH:MM` times, so a time that looks more
//! than twelve hours earlier than the board time is taken to be tomorrow.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Europe::London;
use tracing::debug;

use crate::domain::{ProviderId, UnifiedResult, local_to_utc, parse_hhmm, roll_past_midnight};
use crate::normalize::{ConversionError, Normalized};

use super::types::{LiveBoardResponse, LiveDeparture, TransportApiResponse};

/// Convert a parsed TransportAPI response into unified results.
pub fn convert_response(response: &TransportApiResponse) -> Normalized {
    match response {
        TransportApiResponse::LiveBoard(board) => {
            let departures = board.departures.iter().flat_map(|d| d.all.iter());
            Normalized::collect(departures.map(|d| convert_departure(d, board)))
        }
    }
}

/// Convert one live board departure.
pub fn convert_departure(
    departure: &LiveDeparture,
    board: &LiveBoardResponse,
) -> Result<UnifiedResult, ConversionError> {
    let stop_name = board
        .station_name
        .clone()
        .ok_or(ConversionError::MissingField("station_name"))?;
    let date = board.date.ok_or(ConversionError::MissingField("date"))?;

    let aimed = departure
        .aimed_departure_time
        .as_deref()
        .ok_or(ConversionError::MissingField("aimed_departure_time"))?;
    let scheduled = board_time(date, aimed)?;
    let scheduled = match board_anchor(board, date) {
        Some(anchor) => roll_past_midnight(anchor, scheduled),
        None => scheduled,
    };

    // An unreadable forecast is treated as no forecast
    let actual = departure
        .expected_departure_time
        .as_deref()
        .and_then(|t| match board_time(date, t) {
            Ok(t) => Some(roll_past_midnight(scheduled, t)),
            Err(e) => {
                debug!(error = %e, "ignoring unreadable expected time");
                None
            }
        });

    let mut result =
        UnifiedResult::new(ProviderId::Uk, stop_name).with_times(Some(scheduled), actual);
    result.stop_id = board.station_code.clone();
    result.line_name = departure
        .operator_name
        .clone()
        .or_else(|| departure.service.clone());
    result.direction = departure.destination_name.clone();
    result.platform = departure.platform.clone();
    result.cancelled = departure.is_cancelled();

    Ok(result)
}

fn board_time(date: NaiveDate, hhmm: &str) -> Result<DateTime<Utc>, ConversionError> {
    Ok(local_to_utc(date, parse_hhmm(hhmm)?, London)?)
}

/// When the board was generated, if it says.
fn board_anchor(board: &LiveBoardResponse, date: NaiveDate) -> Option<DateTime<Utc>> {
    let time = board.time_of_day.as_deref()?;
    board_time(date, time).ok()
}
