//! Revocation lookups.
//!
//! A creation record is invalidated by a later revocation record (deletion
//! or cancellation) that names it in the kind's target tag, but only when
//! the revocation was published by the record's own creator or by the
//! marketplace authority. Anyone can write arbitrary tags to the ledger, so
//! the owner check is what makes a revocation count.

use crate::config::ReconcilerConfig;
use plv_core::operation::ItemKind;
use plv_core::record::{Address, Record, RecordId};
use plv_core::tags;
use plv_feed::{stream, FeedError, PagedFeed, Query, TagSelector};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Resolve which of `candidates` have an authorised revocation on the feed.
///
/// Issues one batched query for revocations targeting any candidate id and
/// drains it to exhaustion, so a backlog of revocations larger than one
/// page is still fully observed. The owner restriction on the query is only
/// a server-side narrowing; authorisation is re-checked locally per
/// revocation record. The first feed error aborts the lookup and propagates
/// unchanged.
pub async fn revoked_ids<F: PagedFeed>(
    feed: &Arc<F>,
    config: &ReconcilerConfig,
    kind: &ItemKind,
    candidates: &[Record],
) -> Result<BTreeSet<RecordId>, FeedError> {
    if candidates.is_empty() {
        return Ok(BTreeSet::new());
    }

    let creator_of: BTreeMap<&RecordId, &Address> = candidates
        .iter()
        .map(|record| (record.id(), record.owner()))
        .collect();

    let mut owners: Vec<Address> = vec![config.authority.clone()];
    for record in candidates {
        if !owners.contains(record.owner()) {
            owners.push(record.owner().clone());
        }
    }

    let mut selectors = config.protocol.clone();
    selectors.push(TagSelector::eq(
        tags::OPERATION_NAME,
        kind.revocation.tag_value(),
    ));
    selectors.push(TagSelector::any(
        kind.target_tag,
        candidates.iter().map(|record| record.id().0.clone()),
    ));

    let query = Query::tagged(selectors)
        .owned_by(owners)
        .first(config.lookup_page_size);
    let revocations = stream::drain(feed, query).await?;

    let mut revoked = BTreeSet::new();
    for revocation in &revocations {
        let Some(target) = revocation.tag(kind.target_tag) else {
            continue;
        };
        let target = RecordId::new(target);
        let Some(creator) = creator_of.get(&target) else {
            continue;
        };
        let authorised =
            revocation.owner() == &config.authority || revocation.owner() == *creator;
        if authorised {
            revoked.insert(target);
        }
    }

    debug!(
        candidates = candidates.len(),
        revocations = revocations.len(),
        revoked = revoked.len(),
        kind = %kind.revocation,
        "revocation lookup complete"
    );
    Ok(revoked)
}
