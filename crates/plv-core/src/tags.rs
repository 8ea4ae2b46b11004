//! Wire tag names used by Fairground records.
//!
//! Tags are flat string key/value pairs attached to every ledger record.
//! The names below are the published wire names; they never change once a
//! record referencing them exists on the ledger.

/// Protocol discriminator, present on every Fairground record.
pub const PROTOCOL_NAME: &str = "Protocol-Name";
/// Protocol version, paired with [`PROTOCOL_NAME`].
pub const PROTOCOL_VERSION: &str = "Protocol-Version";
/// Discriminates the record kind (creation, deletion, registration, ...).
pub const OPERATION_NAME: &str = "Operation-Name";
/// Publication timestamp in whole seconds since the Unix epoch.
pub const UNIX_TIME: &str = "Unix-Time";
/// JSON-encoded array of record ids this record supersedes.
pub const PREVIOUS_VERSIONS: &str = "Previous-Versions";

/// Id of the solution a record describes or targets.
pub const SOLUTION_TRANSACTION: &str = "Solution-Transaction";
/// Id of the model a record describes or targets.
pub const MODEL_TRANSACTION: &str = "Model-Transaction";
/// Id of the operator registration a cancellation targets.
pub const REGISTRATION_TRANSACTION: &str = "Registration-Transaction";

pub const SOLUTION_NAME: &str = "Solution-Name";
pub const SOLUTION_CREATOR: &str = "Solution-Creator";
pub const OPERATOR_NAME: &str = "Operator-Name";
pub const OPERATOR_FEE: &str = "Operator-Fee";
pub const SEQUENCER_OWNER: &str = "Sequencer-Owner";

/// Default protocol name stamped by the demo surfaces.
pub const DEFAULT_PROTOCOL_NAME: &str = "Fairground";
/// Default protocol version stamped by the demo surfaces.
pub const DEFAULT_PROTOCOL_VERSION: &str = "1.0";
