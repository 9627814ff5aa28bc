//! Conversion from iRail DTOs to unified results.
//!
//! Field mapping:
//!
//! | unified          | liveboard                   | connections                      | vehicle                  | stations      |
//! |------------------|-----------------------------|----------------------------------|--------------------------|---------------|
//! | `stop_name`      | board `stationinfo.name`    | `departure.station`              | `stop.station`           | `name`        |
//! | `stop_id`        | board `stationinfo.id`      | `departure.stationinfo.id`       | `stop.stationinfo.id`    | `id`          |
//! | `scheduled_time` | `time` (epoch s)            | `departure.time`                 | `stop.time`              | -             |
//! | `actual_time`    | `time + delay`              | `departure.time + delay`         | `stop.time + delay`      | -             |
//! | `line_name`      | `vehicleinfo.shortname`     | `departure.vehicleinfo.shortname`| `vehicleinfo.shortname`  | -             |
//! | `direction`      | `station`                   | `departure.direction.name`       | last stop's `station`    | -             |
//! | `cancelled`      | `canceled`                  | `departure.canceled`             | `stop.canceled`          | -             |
//!
//! `locationX` is longitude and `locationY` latitude.

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{Coordinates, ProviderId, UnifiedResult, parse_unix_seconds};
use crate::normalize::{ConversionError, Normalized};

use super::types::{
    Connection, IrailResponse, LiveboardResponse, NearbyStation, StationInfo, Stop,
    VehicleInfo, VehicleResponse,
};

/// Convert a parsed iRail response into unified results.
pub fn convert_response(response: &IrailResponse) -> Normalized {
    match response {
        IrailResponse::Liveboard(board) => convert_liveboard(board),
        IrailResponse::Stations(stations) => {
            Normalized::collect(stations.iter().map(convert_station))
        }
        IrailResponse::NearbyStations(nearby) => {
            Normalized::collect(nearby.iter().map(convert_nearby))
        }
        IrailResponse::Connections(connections) => {
            Normalized::collect(connections.connection.iter().map(convert_connection))
        }
        IrailResponse::Vehicle(vehicle) => convert_vehicle(vehicle),
    }
}

fn convert_liveboard(board: &LiveboardResponse) -> Normalized {
    let info = board.stationinfo.as_ref();
    let board_name = info
        .and_then(|i| i.name.clone())
        .or_else(|| board.station.clone());

    let departures = board.departures.iter().flat_map(|d| d.departure.iter());

    Normalized::collect(departures.map(|departure| {
        let name = board_name
            .clone()
            .ok_or(ConversionError::MissingField("station"))?;

        let mut result = convert_stop(departure, name)?;
        result.stop_id = info.and_then(|i| i.id.clone());
        result.coordinates = info.and_then(station_coordinates);
        result.line_name = line_name(departure.vehicleinfo.as_ref(), departure.vehicle.as_deref());
        result.direction = departure.station.clone();
        Ok(result)
    }))
}

/// Convert one station list entry.
pub fn convert_station(station: &StationInfo) -> Result<UnifiedResult, ConversionError> {
    let name = station
        .name
        .clone()
        .or_else(|| station.standardname.clone())
        .ok_or(ConversionError::MissingField("name"))?;

    let mut result = UnifiedResult::new(ProviderId::Be, name);
    result.stop_id = station.id.clone();
    result.coordinates = station_coordinates(station);
    Ok(result)
}

fn convert_nearby(nearby: &NearbyStation) -> Result<UnifiedResult, ConversionError> {
    let mut result = convert_station(&nearby.station)?;
    result.distance_m = Some(nearby.distance_m.round());
    Ok(result)
}

/// Convert one connection, described from its departure point.
pub fn convert_connection(connection: &Connection) -> Result<UnifiedResult, ConversionError> {
    let departure = connection
        .departure
        .as_ref()
        .ok_or(ConversionError::MissingField("departure"))?;
    let name = stop_name(departure).ok_or(ConversionError::MissingField("departure.station"))?;

    let mut result = convert_stop(departure, name)?;
    result.stop_id = departure.stationinfo.as_ref().and_then(|i| i.id.clone());
    result.coordinates = departure.stationinfo.as_ref().and_then(station_coordinates);
    result.line_name = line_name(departure.vehicleinfo.as_ref(), departure.vehicle.as_deref());
    result.direction = departure
        .direction
        .as_ref()
        .and_then(|d| d.name.clone())
        .or_else(|| connection.arrival.as_ref().and_then(stop_name));
    Ok(result)
}

fn convert_vehicle(vehicle: &VehicleResponse) -> Normalized {
    let stops: &[Stop] = vehicle.stops.as_ref().map_or(&[], |s| s.stop.as_slice());
    let line = line_name(vehicle.vehicleinfo.as_ref(), vehicle.vehicle.as_deref());
    let terminus = stops.last().and_then(stop_name);

    Normalized::collect(stops.iter().map(|stop| {
        let name = stop_name(stop).ok_or(ConversionError::MissingField("stop.station"))?;

        let mut result = convert_stop(stop, name)?;
        result.stop_id = stop.stationinfo.as_ref().and_then(|i| i.id.clone());
        result.coordinates = stop.stationinfo.as_ref().and_then(station_coordinates);
        result.line_name = line.clone();
        result.direction = terminus.clone();
        Ok(result)
    }))
}

/// Times, platform and cancellation for a timed stop.
fn convert_stop(stop: &Stop, name: String) -> Result<UnifiedResult, ConversionError> {
    let scheduled = stop
        .time
        .as_deref()
        .ok_or(ConversionError::MissingField("time"))?;
    let scheduled = parse_unix_seconds(scheduled)?;

    let actual = stop
        .delay
        .map(|secs| actual_time(scheduled, secs))
        .transpose()?;

    let mut result =
        UnifiedResult::new(ProviderId::Be, name).with_times(Some(scheduled), actual);
    result.platform = stop.platform.clone().filter(|p| p != "?");
    result.cancelled = stop.canceled;
    Ok(result)
}

/// iRail reports lateness as seconds relative to the scheduled time.
fn actual_time(scheduled: DateTime<Utc>, delay_secs: i64) -> Result<DateTime<Utc>, ConversionError> {
    TimeDelta::try_seconds(delay_secs)
        .and_then(|delay| scheduled.checked_add_signed(delay))
        .ok_or(ConversionError::OutOfRange("delay"))
}

fn stop_name(stop: &Stop) -> Option<String> {
    stop.station
        .clone()
        .or_else(|| stop.stationinfo.as_ref().and_then(|i| i.name.clone()))
}

fn station_coordinates(info: &StationInfo) -> Option<Coordinates> {
    Coordinates::new(info.location_y?, info.location_x?)
}

/// "IC 1832" from vehicle info, else the bare vehicle id without its
/// "BE.NMBS." prefix.
fn line_name(info: Option<&VehicleInfo>, vehicle: Option<&str>) -> Option<String> {
    info.and_then(|i| i.shortname.clone()).or_else(|| {
        vehicle.map(|v| v.strip_prefix("BE.NMBS.").unwrap_or(v).to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::irail::types::ConnectionsResponse;
    use chrono::TimeZone;
    use proptest::prelude::*;

    const LIVEBOARD: &str = r#"{
        "station": "Gent-Sint-Pieters",
        "stationinfo": {"id": "BE.NMBS.008892007", "name": "Gent-Sint-Pieters",
                        "locationX": "3.710675", "locationY": "51.035896"},
        "departures": {"number": "3", "departure": [
            {"delay": "180", "station": "Antwerpen-Centraal", "time": "1710495000",
             "vehicle": "BE.NMBS.IC1832", "vehicleinfo": {"shortname": "IC 1832"},
             "platform": "4", "canceled": "0"},
            {"delay": "0", "station": "Oostende", "time": "1710495600",
             "vehicle": "BE.NMBS.IC533", "platform": "?", "canceled": "1"},
            {"delay": "0", "station": "Kortrijk", "time": "not-a-time"}
        ]}
    }"#;

    fn liveboard() -> Normalized {
        let board: LiveboardResponse = serde_json::from_str(LIVEBOARD).unwrap();
        convert_response(&IrailResponse::Liveboard(board))
    }

    #[test]
    fn liveboard_delay_from_seconds() {
        let normalized = liveboard();
        let r = &normalized.results[0];

        assert_eq!(r.provider, ProviderId::Be);
        assert_eq!(r.stop_name, "Gent-Sint-Pieters");
        assert_eq!(r.stop_id.as_deref(), Some("BE.NMBS.008892007"));
        assert_eq!(
            r.scheduled_time,
            Some(Utc.timestamp_opt(1710495000, 0).unwrap())
        );
        assert_eq!(
            r.actual_time,
            Some(Utc.timestamp_opt(1710495180, 0).unwrap())
        );
        assert_eq!(r.delay_minutes, Some(3));
        assert_eq!(r.line_name.as_deref(), Some("IC 1832"));
        assert_eq!(r.direction.as_deref(), Some("Antwerpen-Centraal"));
        assert_eq!(r.platform.as_deref(), Some("4"));
        assert_eq!(r.coordinates.unwrap().longitude, 3.710675);
        assert!(!r.cancelled);
    }

    #[test]
    fn cancelled_departure_kept() {
        let normalized = liveboard();
        let r = &normalized.results[1];

        assert!(r.cancelled);
        assert_eq!(r.delay_minutes, Some(0));
        assert_eq!(r.line_name.as_deref(), Some("IC533"));
        assert!(r.platform.is_none());
    }

    #[test]
    fn bad_time_dropped() {
        let normalized = liveboard();
        assert_eq!(normalized.results.len(), 2);
        assert!(matches!(
            normalized.dropped.as_slice(),
            [ConversionError::InvalidTime(_)]
        ));
    }

    #[test]
    fn overflowing_delay_drops_only_that_departure() {
        let board: LiveboardResponse = serde_json::from_str(
            r#"{"station": "Brugge", "departures": {"departure": [
                {"station": "Oostende", "time": "1710495600", "delay": "9223372036854775807"},
                {"station": "Kortrijk", "time": "1710496200", "delay": "-9223372036854775808"},
                {"station": "Gent-Sint-Pieters", "time": "1710496800", "delay": "60"}
            ]}}"#,
        )
        .unwrap();

        let normalized = convert_response(&IrailResponse::Liveboard(board));
        assert_eq!(normalized.results.len(), 1);
        assert_eq!(normalized.results[0].direction.as_deref(), Some("Gent-Sint-Pieters"));
        assert_eq!(
            normalized.dropped,
            vec![
                ConversionError::OutOfRange("delay"),
                ConversionError::OutOfRange("delay")
            ]
        );
    }

    #[test]
    fn delay_past_last_timestamp_is_dropped() {
        let last = DateTime::<Utc>::MAX_UTC.timestamp().to_string();

        let err = convert_stop(&stop(&last, Some("86400".to_string())), "Brugge".to_string())
            .unwrap_err();
        assert_eq!(err, ConversionError::OutOfRange("delay"));

        let r = convert_stop(&stop(&last, Some("-60".to_string())), "Brugge".to_string()).unwrap();
        assert_eq!(r.delay_minutes, Some(-1));
    }

    #[test]
    fn connection_without_departure_is_dropped_alone() {
        let response: ConnectionsResponse = serde_json::from_str(
            r#"{"connection": [
                {"arrival": {"station": "Antwerpen-Centraal", "time": "1710498000"}},
                {"departure": {"station": "Gent-Sint-Pieters", "time": "1710498600", "delay": "0"}}
            ]}"#,
        )
        .unwrap();

        let normalized = convert_response(&IrailResponse::Connections(response));
        assert_eq!(normalized.results.len(), 1);
        assert_eq!(normalized.results[0].stop_name, "Gent-Sint-Pieters");
        assert!(normalized.results[0].direction.is_none());
        assert_eq!(normalized.dropped, vec![ConversionError::MissingField("departure")]);
    }

    #[test]
    fn missing_delay_means_no_actual_time() {
        let board: LiveboardResponse = serde_json::from_str(
            r#"{"station": "Brugge", "departures": {"departure": [{"time": "1710495000"}]}}"#,
        )
        .unwrap();
        let normalized = convert_response(&IrailResponse::Liveboard(board));
        let r = &normalized.results[0];

        assert_eq!(r.stop_name, "Brugge");
        assert!(r.actual_time.is_none());
        assert!(r.delay_minutes.is_none());
    }

    #[test]
    fn connection_direction_falls_back_to_arrival() {
        let response: ConnectionsResponse = serde_json::from_str(
            r#"{"connection": [
                {"departure": {"station": "Gent-Sint-Pieters", "time": "1710495000", "delay": "120",
                               "vehicle": "BE.NMBS.IC1832", "direction": {"name": "Antwerpen-Centraal"}},
                 "arrival": {"station": "Antwerpen-Centraal", "time": "1710498000"}},
                {"departure": {"station": "Gent-Sint-Pieters", "time": "1710498600", "delay": "0"},
                 "arrival": {"station": "Antwerpen-Berchem", "time": "1710501600"}}
            ]}"#,
        )
        .unwrap();

        let normalized = convert_response(&IrailResponse::Connections(response));
        assert_eq!(normalized.results.len(), 2);
        assert_eq!(normalized.results[0].delay_minutes, Some(2));
        assert_eq!(normalized.results[0].line_name.as_deref(), Some("IC1832"));
        assert_eq!(
            normalized.results[0].direction.as_deref(),
            Some("Antwerpen-Centraal")
        );
        assert_eq!(
            normalized.results[1].direction.as_deref(),
            Some("Antwerpen-Berchem")
        );
    }

    #[test]
    fn vehicle_stops_share_line_and_terminus() {
        let vehicle: VehicleResponse = serde_json::from_str(
            r#"{"vehicle": "BE.NMBS.IC1832", "vehicleinfo": {"shortname": "IC 1832"},
                "stops": {"stop": [
                    {"station": "Oostende", "time": "1710490000", "delay": "0"},
                    {"station": "Brugge", "time": "1710491000", "delay": "60"},
                    {"station": "Gent-Sint-Pieters", "time": "1710492000", "delay": "60"}
                ]}}"#,
        )
        .unwrap();

        let normalized = convert_response(&IrailResponse::Vehicle(vehicle));
        let names: Vec<_> = normalized.results.iter().map(|r| r.stop_name.as_str()).collect();
        assert_eq!(names, vec!["Oostende", "Brugge", "Gent-Sint-Pieters"]);
        assert!(normalized.results.iter().all(|r| {
            r.line_name.as_deref() == Some("IC 1832")
                && r.direction.as_deref() == Some("Gent-Sint-Pieters")
        }));
        assert_eq!(normalized.results[1].delay_minutes, Some(1));
    }

    #[test]
    fn nearby_station_carries_distance() {
        let station: StationInfo = serde_json::from_str(
            r#"{"id": "BE.NMBS.008813003", "name": "Brussels-Central", "locationX": "4.356801", "locationY": "50.845658"}"#,
        )
        .unwrap();
        let nearby = NearbyStation { station, distance_m: 412.6 };

        let normalized = convert_response(&IrailResponse::NearbyStations(vec![nearby]));
        let r = &normalized.results[0];
        assert_eq!(r.distance_m, Some(413.0));
        assert_eq!(r.coordinates.unwrap().latitude, 50.845658);
        assert!(r.scheduled_time.is_none());
    }

    fn stop(time: &str, delay: Option<String>) -> Stop {
        serde_json::from_value(serde_json::json!({
            "station": "Brugge",
            "time": time,
            "delay": delay,
        }))
        .unwrap()
    }

    proptest! {
        #[test]
        fn convert_stop_never_panics_on_numbers(
            time in any::<i64>(),
            delay in prop::option::of(any::<i64>()),
        ) {
            let stop = stop(&time.to_string(), delay.map(|d| d.to_string()));
            match convert_stop(&stop, "Brugge".to_string()) {
                Ok(r) => {
                    prop_assert!(r.scheduled_time.is_some());
                    prop_assert_eq!(r.actual_time.is_some(), delay.is_some());
                }
                Err(e) => prop_assert!(matches!(
                    e,
                    ConversionError::InvalidTime(_) | ConversionError::OutOfRange("delay")
                )),
            }
        }

        #[test]
        fn convert_stop_never_panics_on_text(time in "\\PC*", delay in "\\PC*") {
            let stop = stop(&time, Some(delay));
            let _ = convert_stop(&stop, "Brugge".to_string());
        }

        #[test]
        fn in_range_delay_is_exact(
            time in 0i64..4_102_444_800,
            delay in -86_400i64..86_400,
        ) {
            let stop = stop(&time.to_string(), Some(delay.to_string()));
            let r = convert_stop(&stop, "Brugge".to_string()).unwrap();
            let (scheduled, actual) = (r.scheduled_time.unwrap(), r.actual_time.unwrap());
            prop_assert_eq!((actual - scheduled).num_seconds(), delay);
        }
    }
}
