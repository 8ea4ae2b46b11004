//! Pure, synchronous filters over ledger record sequences.
//!
//! These filters derive the visible subset of a raw marketplace feed
//! without touching the network:
//!
//! - [`version_chain`] removes records superseded by a newer version that
//!   lists them in `Previous-Versions`.
//! - [`latest`] collapses repeat records for the same underlying item down
//!   to the newest one.
//!
//! Both preserve the relative order of the input feed and treat malformed
//! tag data as absent, never as an error.

pub mod latest;
pub mod version_chain;

pub use latest::filter_unique_latest;
pub use version_chain::{filter_superseded, superseded_ids};
