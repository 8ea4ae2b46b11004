//! Property-based tests for the pure feed filters.
//!
//! The laws verified here:
//!  - Idempotence: filtering an already-filtered feed changes nothing
//!  - Exclusion: a record listed in any other record's previous versions
//!    never survives
//!  - Order preservation: survivors keep the relative order of the input
//!  - Malformed tolerance: an unparseable `Previous-Versions` value behaves
//!    exactly like an absent tag

use plv_core::record::{Address, Record, RecordId, Tag};
use plv_core::tags;
use plv_filter::{filter_superseded, filter_unique_latest, superseded_ids};
use proptest::prelude::*;

/// A generated feed entry: the feed positions it supersedes, whether its
/// `Previous-Versions` tag is written as garbage instead, and its item key.
#[derive(Clone, Debug)]
struct GenEntry {
    previous: Vec<usize>,
    malformed: bool,
    item: usize,
}

fn entry_strategy() -> impl Strategy<Value = GenEntry> {
    (
        prop::collection::vec(0..24usize, 0..4),
        any::<bool>(),
        0..12usize,
    )
        .prop_map(|(previous, malformed, item)| GenEntry {
            previous,
            malformed,
            item,
        })
}

fn feed_strategy() -> impl Strategy<Value = Vec<GenEntry>> {
    prop::collection::vec(entry_strategy(), 0..24)
}

/// Record ids are `id-<feed position>`, so `previous` indexes resolve to
/// real records when they land inside the feed and to absent ids when not.
/// Both shapes occur on a live ledger.
fn build_record(entry: &GenEntry, seq: usize) -> Record {
    let mut wire = vec![Tag::new(
        tags::SOLUTION_TRANSACTION,
        format!("item-{}", entry.item),
    )];
    if entry.malformed {
        wire.push(Tag::new(tags::PREVIOUS_VERSIONS, "{not json"));
    } else if !entry.previous.is_empty() {
        let ids: Vec<String> = entry.previous.iter().map(|p| format!("id-{}", p)).collect();
        wire.push(Tag::new(
            tags::PREVIOUS_VERSIONS,
            serde_json::to_string(&ids).unwrap(),
        ));
    }
    Record::decode(
        RecordId::new(format!("id-{}", seq)),
        Address::new("creator"),
        None,
        wire,
    )
}

fn build_feed(entries: &[GenEntry]) -> Vec<Record> {
    entries
        .iter()
        .enumerate()
        .map(|(seq, e)| build_record(e, seq))
        .collect()
}

proptest! {
    #[test]
    fn version_filter_is_idempotent(entries in feed_strategy()) {
        let feed = build_feed(&entries);
        let once = filter_superseded(&feed);
        let twice = filter_superseded(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn superseded_records_never_survive(entries in feed_strategy()) {
        let feed = build_feed(&entries);
        let superseded = superseded_ids(&feed);
        let out = filter_superseded(&feed);
        for record in &out {
            prop_assert!(!superseded.contains(record.id()));
        }
    }

    #[test]
    fn version_filter_preserves_order(entries in feed_strategy()) {
        let feed = build_feed(&entries);
        let out = filter_superseded(&feed);
        let positions: Vec<usize> = out
            .iter()
            .map(|r| feed.iter().position(|f| f.id() == r.id()).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn malformed_previous_versions_equals_absent(entries in feed_strategy()) {
        // Rewrite every malformed tag as absent; the filter output must be
        // the same record sequence.
        let with_garbage = build_feed(&entries);
        let scrubbed: Vec<GenEntry> = entries
            .iter()
            .map(|e| GenEntry {
                previous: if e.malformed { Vec::new() } else { e.previous.clone() },
                malformed: false,
                ..e.clone()
            })
            .collect();
        let without = build_feed(&scrubbed);

        let garbage_ids: Vec<RecordId> = filter_superseded(&with_garbage)
            .iter()
            .map(|r| r.id().clone())
            .collect();
        let scrubbed_ids: Vec<RecordId> = filter_superseded(&without)
            .iter()
            .map(|r| r.id().clone())
            .collect();
        prop_assert_eq!(garbage_ids, scrubbed_ids);
    }

    #[test]
    fn unique_latest_is_idempotent(entries in feed_strategy()) {
        let feed = build_feed(&entries);
        let once = filter_unique_latest(&feed, tags::SOLUTION_TRANSACTION);
        let twice = filter_unique_latest(&once, tags::SOLUTION_TRANSACTION);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn unique_latest_yields_distinct_items(entries in feed_strategy()) {
        let feed = build_feed(&entries);
        let out = filter_unique_latest(&feed, tags::SOLUTION_TRANSACTION);
        let mut items: Vec<RecordId> = out
            .iter()
            .map(|r| r.item_id(tags::SOLUTION_TRANSACTION))
            .collect();
        let before = items.len();
        items.sort();
        items.dedup();
        prop_assert_eq!(before, items.len());
    }

    #[test]
    fn unique_latest_keeps_first_occurrence_per_item(entries in feed_strategy()) {
        let feed = build_feed(&entries);
        let out = filter_unique_latest(&feed, tags::SOLUTION_TRANSACTION);
        for kept in &out {
            let item = kept.item_id(tags::SOLUTION_TRANSACTION);
            let first_with_item = feed
                .iter()
                .find(|r| r.item_id(tags::SOLUTION_TRANSACTION) == item)
                .unwrap();
            prop_assert_eq!(kept.id(), first_with_item.id());
        }
    }
}
