//! Public transport gateway.
//!
//! Answers departures, nearby-station, connection, station-search and
//! vehicle queries from several national APIs (Switzerland, Belgium, UK)
//! through one request shape and one result schema.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod normalize;
pub mod providers;
pub mod tools;
pub mod web;
