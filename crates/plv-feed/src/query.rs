//! Tag/owner queries against a paged feed.

use plv_core::record::Address;

/// Page size used when a query does not specify one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A single tag predicate: the record's value for `name` must equal one of
/// `values`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagSelector {
    pub name: String,
    pub values: Vec<String>,
}

impl TagSelector {
    /// Match a single exact value.
    pub fn eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Match any of the given values.
    pub fn any(name: impl Into<String>, values: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().collect(),
        }
    }
}

/// A paged feed query: conjunction of tag selectors, optional owner
/// restriction, page size and resume cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    /// Every selector must match for a record to be returned.
    pub tags: Vec<TagSelector>,
    /// When non-empty, only records published by one of these addresses.
    pub owners: Vec<Address>,
    /// Maximum records per page.
    pub first: usize,
    /// Resume strictly after this cursor.
    pub after: Option<String>,
}

impl Query {
    pub fn tagged(tags: Vec<TagSelector>) -> Self {
        Self {
            tags,
            owners: Vec::new(),
            first: DEFAULT_PAGE_SIZE,
            after: None,
        }
    }

    pub fn owned_by(mut self, owners: Vec<Address>) -> Self {
        self.owners = owners;
        self
    }

    pub fn first(mut self, first: usize) -> Self {
        self.first = first;
        self
    }

    pub fn after(mut self, cursor: Option<String>) -> Self {
        self.after = cursor;
        self
    }
}
