//! List filtering and pagination.
//!
//! `ListOptions` is a plain struct with builder methods. Each builder call
//! overwrites the field it names, so the last call wins.
//!
//! ```ignore
//! use typestore::{doc, ListOptions};
//!
//! let opts = ListOptions::new()
//!     .with_filter(doc! { "status": "active" })
//!     .with_sort(doc! { "name": 1 })
//!     .with_limit(10);
//! ```

use bson::{Bson, Document};

/// Page size used when no limit (or a zero limit) is given.
pub const DEFAULT_LIMIT: i64 = 50;

/// Driver-level pagination, sort and projection controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Maximum number of documents returned. `None` or `0` means [`DEFAULT_LIMIT`].
    pub limit: Option<i64>,
    /// Number of matching documents to skip before the page starts.
    pub skip: Option<u64>,
    /// Sort specification, e.g. `{ "name": 1, "age": -1 }`.
    pub sort: Option<Document>,
    /// Projection specification, forwarded to the driver.
    pub projection: Option<Document>,
}

/// Options for a `list` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    /// Equality filter, AND-combined with the store's base filter. Empty matches everything.
    pub filter: Document,
    pub find: FindOptions,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter predicate.
    pub fn with_filter(mut self, filter: Document) -> Self {
        self.filter = filter;
        self
    }

    /// Replace all pagination, sort and projection settings at once.
    pub fn with_find_options(mut self, find: FindOptions) -> Self {
        self.find = find;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.find.limit = Some(limit);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.find.skip = Some(skip);
        self
    }

    pub fn with_sort(mut self, sort: Document) -> Self {
        self.find.sort = Some(sort);
        self
    }

    pub fn with_projection(mut self, projection: Document) -> Self {
        self.find.projection = Some(projection);
        self
    }

    /// The limit actually sent to the backend.
    pub fn effective_limit(&self) -> i64 {
        match self.find.limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(limit) => limit,
        }
    }
}

/// AND-combine a base filter with a caller filter.
///
/// Empty filters drop out; when both sides carry predicates the result is
/// `{ "$and": [base, filter] }`.
pub fn combine_filters(base: &Document, filter: &Document) -> Document {
    match (base.is_empty(), filter.is_empty()) {
        (true, _) => filter.clone(),
        (false, true) => base.clone(),
        (false, false) => {
            let mut combined = Document::new();
            combined.insert(
                "$and",
                Bson::Array(vec![
                    Bson::Document(base.clone()),
                    Bson::Document(filter.clone()),
                ]),
            );
            combined
        }
    }
}
