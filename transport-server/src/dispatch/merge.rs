//! Merging per-provider result batches into one sequence.

use std::cmp::Ordering;

use crate::domain::{Capability, UnifiedResult};

/// Merge per-provider batches.
///
/// Batches are concatenated in the order given, so each provider's records
/// stay grouped and keep their upstream order. For capabilities answered in
/// time order (departures) the concatenation is then stable-sorted by
/// `scheduled_time` ascending, with records lacking a time placed last.
///
/// The result depends only on the batches and their order, never on which
/// provider answered first.
pub fn merge(capability: Capability, batches: Vec<Vec<UnifiedResult>>) -> Vec<UnifiedResult> {
    let mut merged: Vec<UnifiedResult> = batches.into_iter().flatten().collect();

    if capability.orders_by_time() {
        merged.sort_by(by_scheduled_time);
    }

    merged
}

/// Ascending by scheduled time; `None` sorts after every `Some`.
fn by_scheduled_time(a: &UnifiedResult, b: &UnifiedResult) -> Ordering {
    match (a.scheduled_time, b.scheduled_time) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
