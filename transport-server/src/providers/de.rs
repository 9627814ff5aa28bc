//! Lenient field deserialisers.
//!
//! Upstreams are inconsistent about quoting: iRail sends every number as a
//! string, opendata.ch sometimes sends line numbers as integers. These
//! helpers accept either and never fail on a type mismatch for scalars.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Optional string that may arrive as a JSON number or bool.
///
/// Empty strings become `None`.
pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        let s = match v {
            Scalar::Str(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        };
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }))
}

/// Optional float that may arrive as a quoted string.
pub(crate) fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Scalar::Str(s) => s.trim().parse().ok(),
        Scalar::Int(i) => Some(i as f64),
        Scalar::Float(f) => Some(f),
        Scalar::Bool(_) => None,
    }))
}

/// Optional integer that may arrive as a quoted string.
pub(crate) fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Scalar::Str(s) => s.trim().parse().ok(),
        Scalar::Int(i) => Some(i),
        Scalar::Float(f) => whole_i64(f),
        Scalar::Bool(_) => None,
    }))
}

/// A float that is exactly an `i64`. Fractions, infinities and values
/// outside the `i64` range give `None`.
fn whole_i64(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Flag sent as `"1"`/`"0"`, `1`/`0` or `true`/`false`. Missing means false.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(match value {
        Some(Scalar::Str(s)) => matches!(s.trim(), "1" | "true"),
        Some(Scalar::Int(i)) => i != 0,
        Some(Scalar::Float(f)) => f != 0.0,
        Some(Scalar::Bool(b)) => b,
        None => false,
    })
}
