//! Canonical result records and dispatch outcomes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Capability, Coordinates, ProviderId};

/// One canonical record produced by the normaliser.
///
/// Optional fields serialise as `null` rather than being omitted, so every
/// record has the same shape regardless of provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedResult {
    pub provider: ProviderId,
    pub stop_name: String,
    pub stop_id: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub actual_time: Option<DateTime<Utc>>,
    pub delay_minutes: Option<i64>,
    pub line_name: Option<String>,
    pub direction: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub platform: Option<String>,
    pub distance_m: Option<f64>,
    pub cancelled: bool,
}

impl UnifiedResult {
    /// A record with only the provider and stop name set.
    pub fn new(provider: ProviderId, stop_name: impl Into<String>) -> Self {
        Self {
            provider,
            stop_name: stop_name.into(),
            stop_id: None,
            scheduled_time: None,
            actual_time: None,
            delay_minutes: None,
            line_name: None,
            direction: None,
            coordinates: None,
            platform: None,
            distance_m: None,
            cancelled: false,
        }
    }

    /// Set scheduled and actual times; the delay is derived from the pair.
    pub fn with_times(
        mut self,
        scheduled: Option<DateTime<Utc>>,
        actual: Option<DateTime<Utc>>,
    ) -> Self {
        self.scheduled_time = scheduled;
        self.actual_time = actual;
        self.delay_minutes = match (scheduled, actual) {
            (Some(s), Some(a)) => Some((a - s).num_minutes()),
            _ => None,
        };
        self
    }
}

/// Machine-readable class of a per-provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidParams,
    UpstreamUnavailable,
    UpstreamError,
    MalformedUpstreamData,
}

/// A provider failure reported alongside the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub provider: ProviderId,
    pub capability: Capability,
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(
        provider: ProviderId,
        capability: Capability,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            capability,
            kind,
            message: message.into(),
        }
    }
}

/// What a dispatch returns: results and errors, always both.
///
/// - results non-empty, errors empty: full success
/// - results non-empty, errors non-empty: partial success
/// - results empty, errors non-empty: total upstream failure
/// - both empty: nothing found
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub results: Vec<UnifiedResult>,
    pub errors: Vec<ErrorRecord>,
}

impl DispatchOutcome {
    pub fn is_partial(&self) -> bool {
        !self.results.is_empty() && !self.errors.is_empty()
    }

    pub fn is_total_failure(&self) -> bool {
        self.results.is_empty() && !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.errors.is_empty()
    }
}
