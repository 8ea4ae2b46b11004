//! The paged fetch capability.

use crate::query::Query;
use async_trait::async_trait;
use plv_core::record::Record;
use thiserror::Error;

/// Errors surfaced by a feed implementation.
///
/// These propagate to callers unchanged; the reconciliation layer never
/// wraps or translates them, so a caller can distinguish a network failure
/// from an empty result.
#[derive(Error, Debug, Clone)]
pub enum FeedError {
    #[error("network failure: {0}")]
    Network(String),

    #[error("query rejected: {0}")]
    Query(String),

    #[error("unknown cursor: {0}")]
    BadCursor(String),
}

/// One page of feed results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Matching records, newest first.
    pub records: Vec<Record>,
    /// Whether another page exists past the last record's cursor.
    pub has_next_page: bool,
}

impl Page {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            has_next_page: false,
        }
    }

    /// Cursor of the last record, for resuming the next page.
    pub fn last_cursor(&self) -> Option<String> {
        self.records
            .last()
            .and_then(|record| record.cursor().map(str::to_string))
    }
}

/// A paged feed of ledger records.
///
/// Implementations return records newest-first and honour `query.after` by
/// resuming strictly past that cursor. The trait is the injection seam for
/// the whole crate family: production code talks to a gateway, tests and
/// demos talk to [`crate::MemoryLedger`].
#[async_trait]
pub trait PagedFeed: Send + Sync + 'static {
    async fn fetch(&self, query: &Query) -> Result<Page, FeedError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use plv_core::record::{Address, RecordId};

    #[test]
    fn last_cursor_comes_from_last_record() {
        let records = vec![
            Record::decode(
                RecordId::new("a"),
                Address::new("x"),
                Some("1".to_string()),
                vec![],
            ),
            Record::decode(
                RecordId::new("b"),
                Address::new("x"),
                Some("2".to_string()),
                vec![],
            ),
        ];
        let page = Page {
            records,
            has_next_page: true,
        };
        assert_eq!(page.last_cursor().as_deref(), Some("2"));
        assert_eq!(Page::empty().last_cursor(), None);
    }
}
