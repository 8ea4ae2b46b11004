//! Paged access to the marketplace ledger.
//!
//! The ledger itself lives behind the [`PagedFeed`] trait: given a tag/owner
//! [`Query`] and a cursor, an implementation returns one [`Page`] of records
//! and says whether more pages exist. Everything above that seam is
//! transport-agnostic:
//!
//! - [`memory`]: an append-only in-memory ledger used by tests and demos
//! - [`driver`]: a consumer-triggered pagination state machine
//! - [`stream`]: helpers that drain a query to exhaustion
//!
//! # Quick Start
//!
//! ```rust
//! use plv_core::record::{Address, Tag};
//! use plv_core::tags;
//! use plv_feed::{MemoryLedger, PagedFeed, Query, TagSelector};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), plv_feed::FeedError> {
//! let ledger = MemoryLedger::new();
//! ledger.publish(
//!     Address::new("creator-1"),
//!     vec![Tag::new(tags::OPERATION_NAME, "Solution-Creation")],
//! );
//!
//! let query = Query::tagged(vec![TagSelector::eq(
//!     tags::OPERATION_NAME,
//!     "Solution-Creation",
//! )]);
//! let page = ledger.fetch(&query).await?;
//! assert_eq!(page.records.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod fetcher;
pub mod memory;
pub mod query;
pub mod stream;

// Re-exports for convenience
pub use driver::{FetchState, PageDriver};
pub use fetcher::{FeedError, Page, PagedFeed};
pub use memory::MemoryLedger;
pub use query::{Query, TagSelector, DEFAULT_PAGE_SIZE};
