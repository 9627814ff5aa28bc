//! Conversion from opendata.ch DTOs to unified results.
//!
//! Field mapping:
//!
//! | unified          | stationboard                         | connections                  | locations    |
//! |------------------|--------------------------------------|------------------------------|--------------|
//! | `stop_name`      | `stop.station.name` / board station  | `from.station.name`          | `name`       |
//! | `stop_id`        | `stop.station.id`                    | `from.station.id`            | `id`         |
//! | `scheduled_time` | `stop.departure`                     | `from.departure`             | -            |
//! | `actual_time`    | `stop.prognosis.departure`           | `from.prognosis.departure`   | -            |
//! | `line_name`      | `category number`, else `name`       | first section journey        | -            |
//! | `direction`      | `to`                                 | `to.station.name`            | -            |
//! | `platform`       | `prognosis.platform`, else `platform`| same, on `from`              | -            |
//! | `distance_m`     | -                                    | -                            | `distance`   |

use tracing::debug;

use crate::domain::{Coordinates, ProviderId, UnifiedResult, parse_offset_datetime};
use crate::normalize::{ConversionError, Normalized};

use super::types::{
    Checkpoint, Connection, Location, OpendataResponse, SectionJourney, StationboardEntry,
};

/// Convert a parsed opendata.ch response into unified results.
///
/// Records that cannot be converted are collected in `dropped` rather than
/// failing the batch.
pub fn convert_response(response: &OpendataResponse) -> Normalized {
    match response {
        OpendataResponse::Stationboard(board) => Normalized::collect(
            board
                .stationboard
                .iter()
                .map(|entry| convert_departure(entry, board.station.as_ref())),
        ),
        OpendataResponse::Locations(locations) => {
            Normalized::collect(locations.stations.iter().map(convert_location))
        }
        OpendataResponse::Connections(connections) => {
            Normalized::collect(connections.connections.iter().map(convert_connection))
        }
    }
}

/// Convert one station board entry.
pub fn convert_departure(
    entry: &StationboardEntry,
    board_station: Option<&Location>,
) -> Result<UnifiedResult, ConversionError> {
    let stop = entry
        .stop
        .as_ref()
        .ok_or(ConversionError::MissingField("stop"))?;
    let stop_station = stop.station.as_ref();

    let stop_name = stop_station
        .and_then(|s| s.name.clone())
        .or_else(|| board_station.and_then(|s| s.name.clone()))
        .ok_or(ConversionError::MissingField("stop name"))?;

    let station = stop_station
        .filter(|s| s.name.is_some())
        .or(board_station);

    let mut result = convert_checkpoint(stop, stop_name, "stop.departure")?;
    result.stop_id = station.and_then(|s| s.id.clone());
    result.coordinates = station.and_then(location_coordinates);
    result.line_name = line_name(
        entry.category.as_deref(),
        entry.number.as_deref(),
        entry.name.as_deref(),
    );
    result.direction = entry.to.clone();

    Ok(result)
}

/// Convert one location search hit.
pub fn convert_location(location: &Location) -> Result<UnifiedResult, ConversionError> {
    let name = location
        .name
        .clone()
        .ok_or(ConversionError::MissingField("name"))?;

    let mut result = UnifiedResult::new(ProviderId::Ch, name);
    result.stop_id = location.id.clone();
    result.coordinates = location_coordinates(location);
    result.distance_m = location.distance;

    Ok(result)
}

/// Convert one connection, described from its departure point.
pub fn convert_connection(connection: &Connection) -> Result<UnifiedResult, ConversionError> {
    let from = connection
        .from
        .as_ref()
        .ok_or(ConversionError::MissingField("from"))?;
    let from_station = from.station.as_ref();

    let stop_name = from_station
        .and_then(|s| s.name.clone())
        .ok_or(ConversionError::MissingField("from.station.name"))?;

    let mut result = convert_checkpoint(from, stop_name, "from.departure")?;
    result.stop_id = from_station.and_then(|s| s.id.clone());
    result.coordinates = from_station.and_then(location_coordinates);
    result.line_name = connection
        .sections
        .iter()
        .find_map(|s| s.journey.as_ref())
        .and_then(journey_line_name);
    result.direction = connection
        .to
        .as_ref()
        .and_then(|to| to.station.as_ref())
        .and_then(|s| s.name.clone());

    Ok(result)
}

/// Times and platform for a departure checkpoint.
fn convert_checkpoint(
    checkpoint: &Checkpoint,
    stop_name: String,
    field: &'static str,
) -> Result<UnifiedResult, ConversionError> {
    let scheduled = checkpoint
        .departure
        .as_deref()
        .ok_or(ConversionError::MissingField(field))?;
    let scheduled = parse_offset_datetime(scheduled)?;

    let prognosis = checkpoint.prognosis.as_ref();

    // An unreadable forecast is treated as no forecast
    let actual = prognosis
        .and_then(|p| p.departure.as_deref())
        .and_then(|t| match parse_offset_datetime(t) {
            Ok(t) => Some(t),
            Err(e) => {
                debug!(error = %e, "ignoring unreadable prognosis");
                None
            }
        });

    let mut result = UnifiedResult::new(ProviderId::Ch, stop_name).with_times(Some(scheduled), actual);
    result.platform = prognosis
        .and_then(|p| p.platform.clone())
        .or_else(|| checkpoint.platform.clone());

    Ok(result)
}

fn location_coordinates(location: &Location) -> Option<Coordinates> {
    let coordinate = location.coordinate.as_ref()?;
    Coordinates::new(coordinate.x?, coordinate.y?)
}

/// "IC 61" from category and number, falling back to the journey name.
fn line_name(category: Option<&str>, number: Option<&str>, name: Option<&str>) -> Option<String> {
    match (category, number) {
        (Some(c), Some(n)) if n.starts_with(c) => Some(n.to_string()),
        (Some(c), Some(n)) => Some(format!("{c} {n}")),
        _ => name.map(str::to_string),
    }
}

fn journey_line_name(journey: &SectionJourney) -> Option<String> {
    line_name(
        journey.category.as_deref(),
        journey.number.as_deref(),
        journey.name.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::opendata::types::{
        ConnectionsResponse, LocationsResponse, StationboardResponse,
    };
    use chrono::{TimeZone, Utc};

    fn board(json: &str) -> StationboardResponse {
        serde_json::from_str(json).unwrap()
    }

    const BOARD: &str = r#"{
        "station": {"id": "8503000", "name": "Zürich HB", "coordinate": {"type": "WGS84", "x": 47.378177, "y": 8.540192}},
        "stationboard": [
            {
                "stop": {
                    "station": {"id": "8503000", "name": "Zürich HB", "coordinate": {"type": "WGS84", "x": 47.378177, "y": 8.540192}},
                    "departure": "2024-03-15T10:32:00+0100",
                    "platform": "31",
                    "prognosis": {"platform": "33", "departure": "2024-03-15T10:35:00+0100"}
                },
                "category": "S", "number": "8", "to": "Pfäffikon SZ"
            },
            {
                "stop": {
                    "station": {"id": "8503000", "name": "Zürich HB"},
                    "departure": "2024-03-15T10:40:00+0100",
                    "platform": "12",
                    "prognosis": null
                },
                "name": "IC 1", "category": "IC", "to": "St. Gallen"
            }
        ]
    }"#;

    #[test]
    fn departure_with_prognosis_has_delay() {
        let board = board(BOARD);
        let r = convert_departure(&board.stationboard[0], board.station.as_ref()).unwrap();

        assert_eq!(r.provider, ProviderId::Ch);
        assert_eq!(r.stop_name, "Zürich HB");
        assert_eq!(r.stop_id.as_deref(), Some("8503000"));
        assert_eq!(
            r.scheduled_time,
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 9, 32, 0).unwrap())
        );
        assert_eq!(
            r.actual_time,
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 9, 35, 0).unwrap())
        );
        assert_eq!(r.delay_minutes, Some(3));
        assert_eq!(r.line_name.as_deref(), Some("S 8"));
        assert_eq!(r.direction.as_deref(), Some("Pfäffikon SZ"));
        assert_eq!(r.platform.as_deref(), Some("33"));
        assert_eq!(r.coordinates.unwrap().latitude, 47.378177);
    }

    #[test]
    fn departure_without_prognosis_has_null_delay() {
        let board = board(BOARD);
        let r = convert_departure(&board.stationboard[1], board.station.as_ref()).unwrap();

        assert!(r.actual_time.is_none());
        assert!(r.delay_minutes.is_none());
        assert_eq!(r.line_name.as_deref(), Some("IC 1"));
        assert_eq!(r.platform.as_deref(), Some("12"));
        // Stop station has no coordinate
        assert!(r.coordinates.is_none());
    }

    #[test]
    fn board_station_used_when_stop_station_missing() {
        let board = board(
            r#"{
            "station": {"id": "8507000", "name": "Bern"},
            "stationboard": [
                {"stop": {"departure": "2024-03-15T10:02:00+0100"}, "name": "IC 61"}
            ]
        }"#,
        );
        let r = convert_departure(&board.stationboard[0], board.station.as_ref()).unwrap();
        assert_eq!(r.stop_name, "Bern");
        assert_eq!(r.stop_id.as_deref(), Some("8507000"));
    }

    #[test]
    fn record_without_stop_name_is_dropped() {
        let response = OpendataResponse::Stationboard(board(
            r#"{
            "station": null,
            "stationboard": [
                {"stop": {"departure": "2024-03-15T10:02:00+0100"}, "name": "IC 61"},
                {"stop": {"station": {"name": "Bern"}, "departure": "2024-03-15T10:04:00+0100"}, "name": "S 1"}
            ]
        }"#,
        ));

        let normalized = convert_response(&response);
        assert_eq!(normalized.results.len(), 1);
        assert_eq!(normalized.results[0].line_name.as_deref(), Some("S 1"));
        assert_eq!(
            normalized.dropped,
            vec![ConversionError::MissingField("stop name")]
        );
    }

    #[test]
    fn record_with_bad_time_is_dropped() {
        let response = OpendataResponse::Stationboard(board(
            r#"{
            "station": {"name": "Bern"},
            "stationboard": [{"stop": {"departure": "soon"}}]
        }"#,
        ));

        let normalized = convert_response(&response);
        assert!(normalized.results.is_empty());
        assert!(matches!(
            normalized.dropped[0],
            ConversionError::InvalidTime(_)
        ));
    }

    #[test]
    fn entry_without_stop_is_dropped_alone() {
        let response = OpendataResponse::Stationboard(board(
            r#"{
            "station": {"id": "8507000", "name": "Bern"},
            "stationboard": [
                {"stop": {"station": {"name": "Bern"}, "departure": "2024-03-15T10:02:00+0100"}, "name": "IC 61"},
                {"name": "S 1", "to": "Thun"}
            ]
        }"#,
        ));

        let normalized = convert_response(&response);
        assert_eq!(normalized.results.len(), 1);
        assert_eq!(normalized.results[0].line_name.as_deref(), Some("IC 61"));
        assert_eq!(normalized.dropped, vec![ConversionError::MissingField("stop")]);
    }

    #[test]
    fn connection_without_from_is_dropped_alone() {
        let connections: ConnectionsResponse = serde_json::from_str(
            r#"{"connections": [
                {"to": {"station": {"name": "Basel SBB"}}},
                {"from": {"station": {"name": "Bern"}, "departure": "2024-03-15T10:02:00+0100"}}
            ]}"#,
        )
        .unwrap();

        let normalized = convert_response(&OpendataResponse::Connections(connections));
        assert_eq!(normalized.results.len(), 1);
        assert_eq!(normalized.results[0].stop_name, "Bern");
        assert!(normalized.results[0].direction.is_none());
        assert_eq!(normalized.dropped, vec![ConversionError::MissingField("from")]);
    }

    #[test]
    fn locations_keep_distance_and_order() {
        let locations: LocationsResponse = serde_json::from_str(
            r#"{"stations": [
                {"id": "8591382", "name": "Zürich, Bahnhofquai/HB", "coordinate": {"x": 47.3774, "y": 8.5418}, "distance": 80},
                {"id": "8503000", "name": "Zürich HB", "coordinate": {"x": 47.378177, "y": 8.540192}, "distance": 150},
                {"id": "x", "name": null}
            ]}"#,
        )
        .unwrap();

        let normalized = convert_response(&OpendataResponse::Locations(locations));
        assert_eq!(normalized.results.len(), 2);
        assert_eq!(normalized.dropped.len(), 1);
        assert_eq!(normalized.results[0].distance_m, Some(80.0));
        assert_eq!(normalized.results[1].stop_name, "Zürich HB");
        assert!(normalized.results[1].scheduled_time.is_none());
    }

    #[test]
    fn connection_uses_first_journey_section() {
        let connections: ConnectionsResponse = serde_json::from_str(
            r#"{"connections": [{
                "from": {"station": {"id": "8507000", "name": "Bern"}, "departure": "2024-03-15T10:02:00+0100", "platform": "7",
                         "prognosis": {"departure": "2024-03-15T10:03:00+0100"}},
                "to": {"station": {"id": "8500010", "name": "Basel SBB"}, "arrival": "2024-03-15T10:57:00+0100"},
                "sections": [
                    {"journey": null},
                    {"journey": {"name": "IC 61", "category": "IC", "number": "61", "to": "Basel SBB"}}
                ]
            }]}"#,
        )
        .unwrap();

        let normalized = convert_response(&OpendataResponse::Connections(connections));
        let r = &normalized.results[0];
        assert_eq!(r.stop_name, "Bern");
        assert_eq!(r.line_name.as_deref(), Some("IC 61"));
        assert_eq!(r.direction.as_deref(), Some("Basel SBB"));
        assert_eq!(r.delay_minutes, Some(1));
        assert_eq!(r.platform.as_deref(), Some("7"));
    }

    #[test]
    fn line_name_variants() {
        assert_eq!(line_name(Some("S"), Some("8"), None).as_deref(), Some("S 8"));
        assert_eq!(line_name(Some("S"), Some("S8"), None).as_deref(), Some("S8"));
        assert_eq!(line_name(Some("B"), None, Some("B 31")).as_deref(), Some("B 31"));
        assert_eq!(line_name(None, None, None), None);
    }
}
