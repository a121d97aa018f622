//! InMemoryBackend - HashMap-backed document storage for testing and development.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bson::{Bson, Document};

use super::{Backend, FindOptions, StoreError};

/// In-memory backend keyed by collection name.
///
/// Documents keep insertion order. Filters support field equality (including
/// dotted paths and array membership) and `$and`; sort, skip and limit are
/// applied, projection is not. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl InMemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents stored in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn read<R>(
        &self,
        collection: &str,
        f: impl FnOnce(&[Document]) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Driver("lock poisoned".into()))?;
        match collections.get(collection) {
            Some(docs) => f(docs),
            None => f(&[]),
        }
    }

    fn write<R>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut Vec<Document>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Driver("lock poisoned".into()))?;
        f(collections.entry(collection.to_string()).or_default())
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.write(collection, |docs| {
            docs.push(document);
            Ok(())
        })
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        self.read(collection, |docs| {
            let mut matched = Vec::new();
            for doc in docs {
                if matches(doc, &filter)? {
                    matched.push(doc.clone());
                }
            }

            if let Some(sort) = &options.sort {
                matched.sort_by(|a, b| compare_by_spec(a, b, sort));
            }

            let skip = options.skip.unwrap_or(0) as usize;
            let page = matched.into_iter().skip(skip);
            Ok(match options.limit {
                None | Some(0) => page.collect(),
                // Negative limits behave like their absolute value, as in MongoDB.
                Some(limit) => page.take(limit.unsigned_abs() as usize).collect(),
            })
        })
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        self.read(collection, |docs| {
            let mut count = 0;
            for doc in docs {
                if matches(doc, &filter)? {
                    count += 1;
                }
            }
            Ok(count)
        })
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.read(collection, |docs| {
            Ok(position(docs, &filter)?.map(|i| docs[i].clone()))
        })
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: Document,
        replacement: Document,
    ) -> Result<u64, StoreError> {
        self.write(collection, |docs| match position(docs, &filter)? {
            Some(i) => {
                docs[i] = replacement;
                Ok(1)
            }
            None => Ok(0),
        })
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        self.write(collection, |docs| match position(docs, &filter)? {
            Some(i) => {
                docs.remove(i);
                Ok(1)
            }
            None => Ok(0),
        })
    }
}

fn position(docs: &[Document], filter: &Document) -> Result<Option<usize>, StoreError> {
    for (i, doc) in docs.iter().enumerate() {
        if matches(doc, filter)? {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

fn matches(doc: &Document, filter: &Document) -> Result<bool, StoreError> {
    for (key, expected) in filter {
        let ok = match key.as_str() {
            "$and" => match expected {
                Bson::Array(clauses) => {
                    let mut all = true;
                    for clause in clauses {
                        match clause {
                            Bson::Document(sub) => {
                                if !matches(doc, sub)? {
                                    all = false;
                                    break;
                                }
                            }
                            _ => {
                                return Err(StoreError::Driver(
                                    "$and clauses must be documents".into(),
                                ))
                            }
                        }
                    }
                    all
                }
                _ => return Err(StoreError::Driver("$and must be an array".into())),
            },
            op if op.starts_with('$') => {
                return Err(StoreError::Driver(format!(
                    "unsupported query operator {op}"
                )))
            }
            path => {
                if let Bson::Document(inner) = expected {
                    if let Some(op) = inner.keys().find(|k| k.starts_with('$')) {
                        return Err(StoreError::Driver(format!(
                            "unsupported query operator {op}"
                        )));
                    }
                }
                field_matches(lookup(doc, path), expected)
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn field_matches(actual: Option<&Bson>, expected: &Bson) -> bool {
    match actual {
        // `{ field: null }` matches documents without the field
        None => matches!(expected, Bson::Null),
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.iter().any(|item| values_equal(item, expected))
        }
        Some(actual) => values_equal(actual, expected),
    }
}

fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Bson::Document(inner) => inner.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn type_rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 1,
        Some(Bson::String(_)) => 2,
        Some(Bson::Document(_)) => 3,
        Some(Bson::Array(_)) => 4,
        Some(Bson::Boolean(_)) => 5,
        Some(Bson::DateTime(_)) => 6,
        Some(_) => 7,
    }
}

fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(Bson::Boolean(x)), Some(Bson::Boolean(y))) => x.cmp(y),
        (Some(Bson::DateTime(x)), Some(Bson::DateTime(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (as_number(x), as_number(y)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

fn compare_by_spec(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (field, direction) in sort {
        let descending = as_number(direction).is_some_and(|d| d < 0.0);
        let mut ord = compare_values(lookup(a, field), lookup(b, field));
        if descending {
            ord = ord.reverse();
        }
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
