//! Test documents.

use serde::{Deserialize, Serialize};
use typestore::Document;

/// Bound to the default collection name, `info`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Document)]
pub struct Info {
    pub id: String,
    pub title: String,
    pub status: String,
    pub rank: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Info {
    pub fn new(id: &str, title: &str, status: &str, rank: i32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            status: status.to_string(),
            rank,
            tags: vec![],
        }
    }
}

/// Explicit collection and a non-default id field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Document)]
#[document(collection = "profiles")]
pub struct UserProfile {
    #[document(id)]
    pub user_id: String,
    pub name: String,
}
