//! Version-chain filtering.
//!
//! A record supersedes earlier versions of itself by listing their ids in
//! its `Previous-Versions` tag. The filter runs in two passes: first the
//! superseded-id set is accumulated across the whole input, then the input
//! is re-walked retaining only records outside that set. Filtering while
//! accumulating would make the result depend on feed order.

use plv_core::record::{Record, RecordId};
use std::collections::BTreeSet;

/// Union of all `Previous-Versions` ids across `records`.
pub fn superseded_ids(records: &[Record]) -> BTreeSet<RecordId> {
    let mut ids = BTreeSet::new();
    for record in records {
        ids.extend(record.previous_versions().iter().cloned());
    }
    ids
}

/// Remove every record whose id appears in another record's
/// `Previous-Versions` list. Relative order is preserved.
///
/// Two records that list each other are both removed: a supersession cycle
/// is malformed input and fails closed rather than guessing a survivor.
pub fn filter_superseded(records: &[Record]) -> Vec<Record> {
    let superseded = superseded_ids(records);
    records
        .iter()
        .filter(|record| !superseded.contains(record.id()))
        .cloned()
        .collect()
}
