//! The fixed tool catalogue.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::domain::{Capability, MAX_LIMIT, ProviderId};

/// One invocable tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub capability: Capability,
    /// `None` for tools that span every enabled provider.
    pub provider: Option<ProviderId>,
    pub description: &'static str,
}

/// Every tool, unified ones first.
pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "get_departures",
        capability: Capability::Departures,
        provider: None,
        description: "Upcoming departures from a station, merged across every enabled country \
                      and ordered by scheduled time. UK stations need a 3-letter CRS code.",
    },
    ToolSpec {
        name: "find_nearby_stations",
        capability: Capability::StationsNearby,
        provider: None,
        description: "Stations near a coordinate (or matching a name), from every enabled country.",
    },
    ToolSpec {
        name: "search_connections",
        capability: Capability::Connections,
        provider: None,
        description: "Train connections between two stations, grouped by country.",
    },
    ToolSpec {
        name: "search_stations",
        capability: Capability::StationsSearch,
        provider: None,
        description: "Stations whose name matches a query, grouped by country.",
    },
    ToolSpec {
        name: "get_vehicle",
        capability: Capability::Vehicle,
        provider: None,
        description: "Stops of one train, e.g. \"IC1832\".",
    },
    ToolSpec {
        name: "ch_get_departures",
        capability: Capability::Departures,
        provider: Some(ProviderId::Ch),
        description: "Departure board for a Swiss station with real-time forecasts.",
    },
    ToolSpec {
        name: "ch_nearby_stations",
        capability: Capability::StationsNearby,
        provider: Some(ProviderId::Ch),
        description: "Swiss stations near a coordinate.",
    },
    ToolSpec {
        name: "ch_search_connections",
        capability: Capability::Connections,
        provider: Some(ProviderId::Ch),
        description: "Connections between two Swiss stations via transport.opendata.ch.",
    },
    ToolSpec {
        name: "ch_search_stations",
        capability: Capability::StationsSearch,
        provider: Some(ProviderId::Ch),
        description: "Swiss stations by name.",
    },
    ToolSpec {
        name: "be_get_departures",
        capability: Capability::Departures,
        provider: Some(ProviderId::Be),
        description: "Live departure board for a Belgian station.",
    },
    ToolSpec {
        name: "be_search_connections",
        capability: Capability::Connections,
        provider: Some(ProviderId::Be),
        description: "Connections between two Belgian stations via iRail.",
    },
    ToolSpec {
        name: "be_search_stations",
        capability: Capability::StationsSearch,
        provider: Some(ProviderId::Be),
        description: "Belgian stations by name.",
    },
    ToolSpec {
        name: "be_get_vehicle",
        capability: Capability::Vehicle,
        provider: Some(ProviderId::Be),
        description: "Stops of a Belgian train by vehicle id.",
    },
    ToolSpec {
        name: "uk_live_departures",
        capability: Capability::Departures,
        provider: Some(ProviderId::Uk),
        description: "Live departures for a UK station by CRS code (e.g. 'PAD' for London \
                      Paddington).",
    },
];

/// Look a tool up by name.
pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|t| t.name == name)
}

/// A tool as listed to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub capability: Capability,
    pub providers: Vec<ProviderId>,
    pub input_schema: Value,
}

impl ToolSpec {
    /// The listing entry, given the providers that would answer it.
    pub fn definition(&self, providers: Vec<ProviderId>) -> ToolDefinition {
        ToolDefinition {
            name: self.name,
            description: self.description,
            capability: self.capability,
            providers,
            input_schema: self.input_schema(),
        }
    }

    /// JSON Schema for the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let (mut properties, required) = capability_properties(self.capability);

        if self.provider.is_none() {
            properties.insert(
                "providers".to_string(),
                json!({
                    "type": "array",
                    "items": {"type": "string", "enum": ["ch", "be", "uk"]},
                    "description": "Optional: only ask these providers"
                }),
            );
        }

        let mut schema = json!({
            "type": "object",
            "properties": Value::Object(properties),
            "additionalProperties": false
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}

fn capability_properties(capability: Capability) -> (Map<String, Value>, Vec<&'static str>) {
    let limit = json!({
        "type": "integer",
        "minimum": 1,
        "maximum": MAX_LIMIT,
        "description": "Optional: maximum results per provider"
    });
    let date = json!({
        "type": "string",
        "format": "date",
        "description": "Optional: local date, YYYY-MM-DD (default: today)"
    });
    let time = json!({
        "type": "string",
        "description": "Optional: local time, HH:MM (default: now)"
    });

    let (properties, required) = match capability {
        Capability::Departures => (
            json!({
                "station": {"type": "string", "description": "Station name or id; CRS code for UK"},
                "date": date,
                "time": time,
                "limit": limit
            }),
            vec!["station"],
        ),
        Capability::StationsNearby => (
            json!({
                "latitude": {"type": "number", "minimum": -90, "maximum": 90},
                "longitude": {"type": "number", "minimum": -180, "maximum": 180},
                "station": {"type": "string", "description": "Station name, used when no coordinates are given"},
                "radius_m": {"type": "integer", "minimum": 1, "description": "Optional: search radius in metres (default: 1000)"},
                "limit": limit
            }),
            vec![],
        ),
        Capability::Connections => (
            json!({
                "origin": {"type": "string", "description": "Departure station name"},
                "destination": {"type": "string", "description": "Arrival station name"},
                "date": date,
                "time": time,
                "arrive_by": {"type": "boolean", "description": "Optional: time is the arrival time"},
                "limit": limit
            }),
            vec!["origin", "destination"],
        ),
        Capability::StationsSearch => (
            json!({
                "query": {"type": "string", "description": "Part of a station name"},
                "limit": limit
            }),
            vec!["query"],
        ),
        Capability::Vehicle => (
            json!({
                "vehicle_id": {"type": "string", "description": "Train id, e.g. IC1832 or BE.NMBS.IC1832"},
                "date": date
            }),
            vec!["vehicle_id"],
        ),
    };

    match properties {
        Value::Object(map) => (map, required),
        _ => (Map::new(), required),
    }
}
