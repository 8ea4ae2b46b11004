//! Unique-latest collapsing.
//!
//! A feed can carry several records for the same underlying item: repeat
//! payments, re-publications, older versions not linked through
//! `Previous-Versions`. Feeds arrive newest-first, so keeping the first
//! record per item id keeps the latest.

use plv_core::record::Record;
use std::collections::BTreeSet;

/// Keep the first (newest) record per distinct item id, preserving order.
///
/// `item_tag` names the tag holding the underlying item's id on each
/// record; records without it stand for themselves and are keyed by their
/// own id.
pub fn filter_unique_latest(records: &[Record], item_tag: &str) -> Vec<Record> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.item_id(item_tag)))
        .cloned()
        .collect()
}
