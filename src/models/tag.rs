// src/models/tag.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum stored length of a tag name.
pub const MAX_TAG_NAME_LEN: usize = 50;

/// Represents the 'tags' table. Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Case-folded form of a tag name; two names are the same tag iff their keys match.
pub fn tag_key(name: &str) -> String {
    name.trim().to_lowercase()
}
