//! The reconciliation pipeline.

use crate::config::ReconcilerConfig;
use crate::revocation::revoked_ids;
use plv_core::operation::ItemKind;
use plv_core::record::Record;
use plv_core::tags;
use plv_feed::{stream, FeedError, PagedFeed, Query, TagSelector};
use plv_filter::{filter_superseded, filter_unique_latest};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Result of one reconciliation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The canonical visible set, in feed order (newest first).
    Complete(Vec<Record>),
    /// A newer pass started while this one awaited the feed; the result
    /// was discarded. The caller keeps its last-known-good view.
    Superseded,
}

/// Resolves canonical item sets from raw marketplace feeds.
///
/// The reconciler owns no state beyond its feed handle, its configuration
/// and a pass counter: every pass is a pure function of its input records
/// and the ledger's content at lookup time.
pub struct Reconciler<F: PagedFeed> {
    feed: Arc<F>,
    config: ReconcilerConfig,
    generation: AtomicU64,
}

impl<F: PagedFeed> Reconciler<F> {
    pub fn new(feed: Arc<F>, config: ReconcilerConfig) -> Self {
        Self {
            feed,
            config,
            generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Resolve the canonical set from an already-fetched feed slice.
    ///
    /// Pipeline: version-chain filter, unique-latest collapse, revocation
    /// filter. Relative feed order is preserved end to end. Starting a new
    /// pass supersedes any pass still in flight: the older pass reports
    /// [`ReconcileOutcome::Superseded`] instead of returning stale results.
    pub async fn reconcile(
        &self,
        kind: &ItemKind,
        records: Vec<Record>,
    ) -> Result<ReconcileOutcome, FeedError> {
        let pass = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let current = filter_superseded(&records);
        let candidates = filter_unique_latest(&current, kind.item_tag);
        debug!(
            raw = records.len(),
            candidates = candidates.len(),
            pass,
            "version filtering complete"
        );

        if candidates.is_empty() {
            return Ok(ReconcileOutcome::Complete(Vec::new()));
        }

        let revoked = revoked_ids(&self.feed, &self.config, kind, &candidates).await?;
        if self.generation.load(Ordering::SeqCst) != pass {
            debug!(pass, "pass superseded, discarding result");
            return Ok(ReconcileOutcome::Superseded);
        }

        let visible: Vec<Record> = candidates
            .into_iter()
            .filter(|record| !revoked.contains(record.id()))
            .collect();
        Ok(ReconcileOutcome::Complete(visible))
    }

    /// Drain the creation feed for `kind` and reconcile it.
    pub async fn reconcile_feed(&self, kind: &ItemKind) -> Result<ReconcileOutcome, FeedError> {
        let mut selectors = self.config.protocol.clone();
        selectors.push(TagSelector::eq(
            tags::OPERATION_NAME,
            kind.creation.tag_value(),
        ));
        let query = Query::tagged(selectors).first(self.config.lookup_page_size);

        let records = stream::drain(&self.feed, query).await?;
        self.reconcile(kind, records).await
    }
}
