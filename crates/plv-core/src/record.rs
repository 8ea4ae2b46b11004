//! Ledger records and the transport decode boundary.
//!
//! A [`Record`] is an immutable entry in the append-only marketplace ledger.
//! Records arrive from a feed as an id, an owner address and a flat list of
//! string tags; [`Record::decode`] is the single point where tag values with
//! structure (the JSON array inside `Previous-Versions`) are parsed into
//! typed fields. Malformed structured values decode to "absent".

use crate::operation::OperationKind;
use crate::tags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier of a ledger record.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of the account that published a record.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named string tag as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An immutable, decoded ledger record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    owner: Address,
    /// Opaque discovery cursor assigned by the feed, if known.
    cursor: Option<String>,
    tags: BTreeMap<String, String>,
    /// Ids this record supersedes, decoded from `Previous-Versions`.
    previous_versions: Vec<RecordId>,
}

impl Record {
    /// Decode a record from its transport parts.
    ///
    /// Duplicate tag names keep the first occurrence. A `Previous-Versions`
    /// value that is not a JSON array of strings decodes to an empty list;
    /// structural problems in a single tag never fail the record.
    pub fn decode(
        id: RecordId,
        owner: Address,
        cursor: Option<String>,
        wire_tags: Vec<Tag>,
    ) -> Self {
        let mut tags = BTreeMap::new();
        for tag in wire_tags {
            tags.entry(tag.name).or_insert(tag.value);
        }

        let previous_versions = tags
            .get(tags::PREVIOUS_VERSIONS)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default()
            .into_iter()
            .map(RecordId)
            .collect();

        Self {
            id,
            owner,
            cursor,
            tags,
            previous_versions,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Value of a tag by wire name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Ids this record supersedes. Empty when the tag is absent or malformed.
    pub fn previous_versions(&self) -> &[RecordId] {
        &self.previous_versions
    }

    /// The record kind, if `Operation-Name` carries a known value.
    pub fn operation(&self) -> Option<OperationKind> {
        self.tag(tags::OPERATION_NAME)
            .and_then(OperationKind::from_tag_value)
    }

    /// Publication time in seconds since the epoch, if present and numeric.
    pub fn unix_time(&self) -> Option<u64> {
        self.tag(tags::UNIX_TIME).and_then(|t| t.parse().ok())
    }

    /// The id of the underlying item this record describes.
    ///
    /// Creation records reference their item through a kind-specific tag
    /// (e.g. `Solution-Transaction`); records missing it stand for
    /// themselves.
    pub fn item_id(&self, item_tag: &str) -> RecordId {
        match self.tag(item_tag) {
            Some(value) => RecordId::new(value),
            None => self.id.clone(),
        }
    }
}
