//! Consumer-triggered pagination.
//!
//! A [`PageDriver`] grows an accumulated record list one page at a time as
//! the consumer signals "need more" (a scroll hitting a sentinel, a
//! load-more button). The driver is a three-state machine:
//!
//! ```text
//! Idle ──request_more──▶ Fetching ──ok──▶ Idle
//!                            │
//!                          error
//!                            ▼
//!                          Error ──retry──▶ Idle
//! ```
//!
//! At most one fetch is in flight per driver; a second signal while
//! `Fetching` is a no-op. A failed fetch parks the driver in `Error` until
//! the consumer explicitly retries; records accumulated before the failure
//! stay available.

use crate::fetcher::{FeedError, PagedFeed};
use crate::query::Query;
use plv_core::record::Record;
use std::sync::Arc;
use tracing::{debug, warn};

/// Pagination state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching,
    Error,
}

/// Drives repeated fetches of one query, accumulating results.
pub struct PageDriver<F: PagedFeed> {
    feed: Arc<F>,
    base: Query,
    state: FetchState,
    records: Vec<Record>,
    /// Whether the feed reported more pages past the last fetched one.
    /// Starts `true`: nothing has been fetched yet.
    has_next_page: bool,
}

impl<F: PagedFeed> PageDriver<F> {
    pub fn new(feed: Arc<F>, base: Query) -> Self {
        Self {
            feed,
            base,
            state: FetchState::Idle,
            records: Vec::new(),
            has_next_page: true,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Records accumulated so far, in feed order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Whether another `request_more` could yield records.
    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Fetch the next page if the driver is idle and more pages exist.
    ///
    /// Returns `Ok(true)` when a page was appended, `Ok(false)` when the
    /// signal was a no-op (already fetching, exhausted, or parked in
    /// `Error`). A fetch failure transitions to `Error` and surfaces the
    /// feed's error unchanged.
    pub async fn request_more(&mut self) -> Result<bool, FeedError> {
        if self.state != FetchState::Idle || !self.has_next_page {
            return Ok(false);
        }

        self.state = FetchState::Fetching;
        let cursor = self
            .records
            .last()
            .and_then(|record| record.cursor().map(str::to_string));
        let query = self.base.clone().after(cursor);

        match self.feed.fetch(&query).await {
            Ok(page) => {
                debug!(
                    fetched = page.records.len(),
                    total = self.records.len() + page.records.len(),
                    has_next = page.has_next_page,
                    "page fetched"
                );
                self.has_next_page = page.has_next_page;
                self.records.extend(page.records);
                self.state = FetchState::Idle;
                Ok(true)
            }
            Err(err) => {
                warn!(error = %err, "page fetch failed");
                self.state = FetchState::Error;
                Err(err)
            }
        }
    }

    /// Leave the `Error` state; the next `request_more` will re-attempt the
    /// failed page. No-op outside `Error`.
    pub fn retry(&mut self) {
        if self.state == FetchState::Error {
            self.state = FetchState::Idle;
        }
    }
}
