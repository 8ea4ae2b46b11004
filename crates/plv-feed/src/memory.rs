//! In-memory append-only ledger for tests, demos and simulations.

use crate::fetcher::{FeedError, Page, PagedFeed};
use crate::query::Query;
use async_trait::async_trait;
use parking_lot::RwLock;
use plv_core::record::{Address, Record, RecordId, Tag};
use std::sync::Arc;
use ulid::Ulid;

/// An append-only in-memory ledger implementing [`PagedFeed`].
///
/// Records are immutable once published. Ids are minted as ULIDs and each
/// record gets a monotonically increasing cursor, so pagination order is
/// exactly reverse publication order (newest first), matching the gateway
/// feeds this stands in for.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    entries: Arc<RwLock<Vec<Record>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record with a freshly minted id. Returns the new id.
    pub fn publish(&self, owner: Address, tags: Vec<Tag>) -> RecordId {
        let id = RecordId::new(Ulid::new().to_string());
        self.publish_with_id(id.clone(), owner, tags);
        id
    }

    /// Append a record under a caller-chosen id (tests that need stable
    /// ids).
    pub fn publish_with_id(&self, id: RecordId, owner: Address, tags: Vec<Tag>) {
        let mut entries = self.entries.write();
        let cursor = format!("{:08}", entries.len());
        entries.push(Record::decode(id, owner, Some(cursor), tags));
    }

    /// Number of records on the ledger.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn matches(record: &Record, query: &Query) -> bool {
        let tags_match = query.tags.iter().all(|selector| {
            record
                .tag(&selector.name)
                .map(|value| selector.values.iter().any(|v| v == value))
                .unwrap_or(false)
        });
        let owner_match =
            query.owners.is_empty() || query.owners.iter().any(|o| o == record.owner());
        tags_match && owner_match
    }
}

#[async_trait]
impl PagedFeed for MemoryLedger {
    async fn fetch(&self, query: &Query) -> Result<Page, FeedError> {
        let entries = self.entries.read();

        // Newest first; resume strictly past `after` when given.
        let mut matching = entries
            .iter()
            .rev()
            .filter(|record| Self::matches(record, query));

        if let Some(after) = &query.after {
            let mut found = false;
            for record in matching.by_ref() {
                if record.cursor() == Some(after.as_str()) {
                    found = true;
                    break;
                }
            }
            if !found {
                return Err(FeedError::BadCursor(after.clone()));
            }
        }

        let mut records: Vec<Record> = Vec::with_capacity(query.first);
        let mut has_next_page = false;
        for record in matching {
            if records.len() == query.first {
                has_next_page = true;
                break;
            }
            records.push(record.clone());
        }

        Ok(Page {
            records,
            has_next_page,
        })
    }
}
