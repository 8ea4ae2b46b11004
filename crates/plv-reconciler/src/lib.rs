//! Canonical-view reconciliation.
//!
//! A marketplace feed is an append-only sequence of tagged records: item
//! creations, version updates that supersede earlier records, and
//! revocations (deletions/cancellations) that invalidate them. The
//! [`Reconciler`] resolves the canonical, currently-visible item set from a
//! raw feed:
//!
//! 1. drop records superseded through `Previous-Versions` chains,
//! 2. collapse repeat records per underlying item to the newest,
//! 3. drop records revoked by their own creator or the marketplace
//!    authority.
//!
//! The result is pure derived state: nothing is persisted, and a pass whose
//! inputs went stale reports [`ReconcileOutcome::Superseded`] so the caller
//! can discard it and keep the last-known-good view. Feed errors propagate
//! unchanged.
//!
//! # Quick Start
//!
//! ```rust
//! use plv_core::operation::ItemKind;
//! use plv_core::record::{Address, Tag};
//! use plv_core::tags;
//! use plv_feed::MemoryLedger;
//! use plv_reconciler::{Reconciler, ReconcilerConfig, ReconcileOutcome};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), plv_feed::FeedError> {
//! let ledger = Arc::new(MemoryLedger::new());
//! ledger.publish(
//!     Address::new("creator-1"),
//!     vec![
//!         Tag::new(tags::PROTOCOL_NAME, tags::DEFAULT_PROTOCOL_NAME),
//!         Tag::new(tags::PROTOCOL_VERSION, tags::DEFAULT_PROTOCOL_VERSION),
//!         Tag::new(tags::OPERATION_NAME, "Solution-Creation"),
//!         Tag::new(tags::SOLUTION_NAME, "summarizer"),
//!     ],
//! );
//!
//! let config = ReconcilerConfig::new(Address::new("marketplace-authority"));
//! let reconciler = Reconciler::new(ledger, config);
//! match reconciler.reconcile_feed(&ItemKind::SOLUTION).await? {
//!     ReconcileOutcome::Complete(visible) => assert_eq!(visible.len(), 1),
//!     ReconcileOutcome::Superseded => unreachable!("no concurrent pass"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod reconciler;
pub mod revocation;

// Re-exports for convenience
pub use config::{ReconcilerConfig, ReconcilerConfigBuilder};
pub use reconciler::{ReconcileOutcome, Reconciler};
pub use revocation::revoked_ids;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::ReconcilerConfig;
    pub use crate::reconciler::{ReconcileOutcome, Reconciler};
    pub use plv_core::operation::ItemKind;
    pub use plv_feed::{FeedError, MemoryLedger, PagedFeed, Query, TagSelector};
}
