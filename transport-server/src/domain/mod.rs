//! Domain types for the transport gateway.
//!
//! These are the provider-independent shapes: what a caller asks for
//! ([`UnifiedRequest`]) and what it gets back ([`DispatchOutcome`]).
//! Validating types enforce their invariants at construction time.

mod capability;
mod geo;
mod request;
mod result;
mod time;

pub use capability::{Capability, ProviderId, UnknownName};
pub use geo::Coordinates;
pub use request::{
    DEFAULT_CONNECTIONS_LIMIT, DEFAULT_DEPARTURES_LIMIT, DEFAULT_RADIUS_M,
    DEFAULT_STATIONS_LIMIT, InvalidParams, MAX_LIMIT, QueryParams, UnifiedRequest,
};
pub use result::{DispatchOutcome, ErrorKind, ErrorRecord, UnifiedResult};
pub use time::{
    TimeError, local_to_utc, parse_hhmm, parse_offset_datetime, parse_unix_seconds,
    roll_past_midnight,
};
