//! Operation vocabulary for marketplace records.
//!
//! Every record carries an `Operation-Name` tag discriminating what it is:
//! a creation of some item, or a revocation (deletion/cancellation) that
//! references an earlier record through a target tag. [`ItemKind`] bundles
//! the pairing so callers never mix a creation kind with the wrong
//! revocation kind or target tag.

use crate::tags;
use serde::{Deserialize, Serialize};

/// The kind of a ledger record, as published in `Operation-Name`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    SolutionCreation,
    SolutionDeletion,
    ModelCreation,
    ModelDeletion,
    OperatorRegistration,
    RegistrationCancellation,
}

impl OperationKind {
    /// The wire value published in the `Operation-Name` tag.
    pub fn tag_value(self) -> &'static str {
        match self {
            OperationKind::SolutionCreation => "Solution-Creation",
            OperationKind::SolutionDeletion => "Solution-Deletion",
            OperationKind::ModelCreation => "Model-Creation",
            OperationKind::ModelDeletion => "Model-Deletion",
            OperationKind::OperatorRegistration => "Operator-Registration",
            OperationKind::RegistrationCancellation => "Registration-Cancellation",
        }
    }

    pub fn from_tag_value(value: &str) -> Option<Self> {
        match value {
            "Solution-Creation" => Some(OperationKind::SolutionCreation),
            "Solution-Deletion" => Some(OperationKind::SolutionDeletion),
            "Model-Creation" => Some(OperationKind::ModelCreation),
            "Model-Deletion" => Some(OperationKind::ModelDeletion),
            "Operator-Registration" => Some(OperationKind::OperatorRegistration),
            "Registration-Cancellation" => Some(OperationKind::RegistrationCancellation),
            _ => None,
        }
    }

    /// Whether this kind invalidates an earlier record rather than creating
    /// an item.
    pub fn is_revocation(self) -> bool {
        matches!(
            self,
            OperationKind::SolutionDeletion
                | OperationKind::ModelDeletion
                | OperationKind::RegistrationCancellation
        )
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag_value())
    }
}

/// Descriptor of one family of marketplace items.
///
/// Ties together the creation operation, the revocation operation that
/// invalidates it, the tag a revocation uses to reference its target record,
/// and the tag naming the underlying item on creation records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemKind {
    pub creation: OperationKind,
    pub revocation: OperationKind,
    /// Tag on revocation records holding the targeted record's id.
    pub target_tag: &'static str,
    /// Tag on creation records naming the underlying item.
    pub item_tag: &'static str,
}

impl ItemKind {
    /// Published scripts/solutions, removable by `Solution-Deletion`.
    pub const SOLUTION: ItemKind = ItemKind {
        creation: OperationKind::SolutionCreation,
        revocation: OperationKind::SolutionDeletion,
        target_tag: tags::SOLUTION_TRANSACTION,
        item_tag: tags::SOLUTION_TRANSACTION,
    };

    /// Published models, removable by `Model-Deletion`.
    pub const MODEL: ItemKind = ItemKind {
        creation: OperationKind::ModelCreation,
        revocation: OperationKind::ModelDeletion,
        target_tag: tags::MODEL_TRANSACTION,
        item_tag: tags::MODEL_TRANSACTION,
    };

    /// Operator registrations, removable by `Registration-Cancellation`.
    pub const REGISTRATION: ItemKind = ItemKind {
        creation: OperationKind::OperatorRegistration,
        revocation: OperationKind::RegistrationCancellation,
        target_tag: tags::REGISTRATION_TRANSACTION,
        item_tag: tags::REGISTRATION_TRANSACTION,
    };
}
