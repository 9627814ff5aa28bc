//! Result normaliser.
//!
//! Pure conversion from a provider's raw response into the unified schema.
//! The per-provider field tables live next to each provider's DTOs
//! (`providers::*::convert`); this module only routes to them and defines
//! the record-level error.

use crate::domain::{TimeError, UnifiedResult};
use crate::providers::{RawProviderResult, irail, opendata, transportapi};

/// A record that could not be mapped to the unified schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// A field the unified schema needs has no sensible default.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A required timestamp could not be parsed.
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// A numeric field is too large to turn into a timestamp.
    #[error("{0} out of range")]
    OutOfRange(&'static str),
}

/// Output of normalising one provider response.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Converted records in upstream order.
    pub results: Vec<UnifiedResult>,
    /// Why each unconvertible record was dropped.
    pub dropped: Vec<ConversionError>,
}

impl Normalized {
    /// Split per-record outcomes into results and drop reasons, keeping order.
    pub fn collect<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Result<UnifiedResult, ConversionError>>,
    {
        let mut normalized = Normalized::default();
        for record in records {
            match record {
                Ok(result) => normalized.results.push(result),
                Err(e) => normalized.dropped.push(e),
            }
        }
        normalized
    }
}

/// Normalise a raw provider result.
///
/// The provider is carried by the `RawProviderResult` variant, so every
/// produced record is tagged with the provider that fetched it.
pub fn normalize(raw: &RawProviderResult) -> Normalized {
    match raw {
        RawProviderResult::Opendata(response) => opendata::convert_response(response),
        RawProviderResult::Irail(response) => irail::convert_response(response),
        RawProviderResult::TransportApi(response) => transportapi::convert_response(response),
    }
}
