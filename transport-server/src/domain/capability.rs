//! Capabilities and provider identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown capability or provider name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value}")]
pub struct UnknownName {
    what: &'static str,
    value: String,
}

/// A class of query that zero or more providers can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Live departure board for one station.
    Departures,
    /// Stations around a coordinate (or matching a name).
    StationsNearby,
    /// Journeys between two stations.
    Connections,
    /// Stations matching a free-text name.
    StationsSearch,
    /// Stops of a single vehicle.
    Vehicle,
}

impl Capability {
    /// Every capability, in a fixed order.
    pub const ALL: [Capability; 5] = [
        Capability::Departures,
        Capability::StationsNearby,
        Capability::Connections,
        Capability::StationsSearch,
        Capability::Vehicle,
    ];

    /// Returns the wire name (e.g. `stations-nearby`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Departures => "departures",
            Capability::StationsNearby => "stations-nearby",
            Capability::Connections => "connections",
            Capability::StationsSearch => "stations-search",
            Capability::Vehicle => "vehicle",
        }
    }

    /// Whether merged results are ordered by scheduled time rather than
    /// grouped by provider.
    pub fn orders_by_time(&self) -> bool {
        matches!(self, Capability::Departures)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownName {
                what: "capability",
                value: s.to_string(),
            })
    }
}

/// One upstream public-transport data source.
///
/// The declaration order is the provider-grouped output order used when
/// results are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Switzerland, transport.opendata.ch
    #[serde(alias = "CH")]
    Ch,
    /// Belgium, api.irail.be
    #[serde(alias = "BE")]
    Be,
    /// United Kingdom, transportapi.com
    #[serde(alias = "UK")]
    Uk,
}

impl ProviderId {
    /// Every provider, in output order.
    pub const ALL: [ProviderId; 3] = [ProviderId::Ch, ProviderId::Be, ProviderId::Uk];

    /// Returns the short lowercase id (`ch`, `be`, `uk`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Ch => "ch",
            ProviderId::Be => "be",
            ProviderId::Uk => "uk",
        }
    }

    /// Human-readable country name.
    pub fn country(&self) -> &'static str {
        match self {
            ProviderId::Ch => "Switzerland",
            ProviderId::Be => "Belgium",
            ProviderId::Uk => "United Kingdom",
        }
    }

    /// Capabilities the upstream API can answer.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            ProviderId::Ch => &[
                Capability::Departures,
                Capability::StationsNearby,
                Capability::Connections,
                Capability::StationsSearch,
            ],
            ProviderId::Be => &[
                Capability::Departures,
                Capability::StationsNearby,
                Capability::Connections,
                Capability::StationsSearch,
                Capability::Vehicle,
            ],
            ProviderId::Uk => &[Capability::Departures],
        }
    }

    /// Whether this provider can answer `capability`.
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ProviderId::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| UnknownName {
                what: "provider",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_wire_names() {
        assert_eq!(Capability::StationsNearby.to_string(), "stations-nearby");
        assert_eq!(
            serde_json::to_string(&Capability::StationsSearch).unwrap(),
            r#""stations-search""#
        );
        assert_eq!(
            "connections".parse::<Capability>().unwrap(),
            Capability::Connections
        );
        assert!("arrivals".parse::<Capability>().is_err());
    }

    #[test]
    fn provider_parsing_is_case_insensitive() {
        assert_eq!("CH".parse::<ProviderId>().unwrap(), ProviderId::Ch);
        assert_eq!(" be ".parse::<ProviderId>().unwrap(), ProviderId::Be);
        assert_eq!(
            serde_json::from_str::<ProviderId>(r#""UK""#).unwrap(),
            ProviderId::Uk
        );
        assert!("no".parse::<ProviderId>().is_err());
    }

    #[test]
    fn capability_table() {
        for provider in ProviderId::ALL {
            assert!(provider.supports(Capability::Departures));
        }
        assert!(ProviderId::Be.supports(Capability::Vehicle));
        assert!(!ProviderId::Ch.supports(Capability::Vehicle));
        assert!(!ProviderId::Uk.supports(Capability::Connections));
    }

    #[test]
    fn provider_order_is_output_order() {
        let mut ids = vec![ProviderId::Uk, ProviderId::Ch, ProviderId::Be];
        ids.sort();
        assert_eq!(ids, ProviderId::ALL.to_vec());
    }
}
