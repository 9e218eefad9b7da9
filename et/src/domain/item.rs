//! Checklist item record

use serde::{Deserialize, Serialize};

use super::id::{generate_id, now_ms};

/// A single checklist entry belonging to a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Owning category ID (or the Unsorted sentinel)
    pub category_id: String,

    /// Whether the item has been ticked off today
    pub checked: bool,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl Item {
    /// Create a new unchecked item with a generated ID
    pub fn new(name: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            category_id: category_id.into(),
            checked: false,
            created_at: now_ms(),
        }
    }

    /// Check if the item is filed under the given category
    pub fn belongs_to(&self, category_id: &str) -> bool {
        self.category_id == category_id
    }
}

/// Input for creating an item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    /// Missing deserializes as empty and is rejected by validation
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category_id: String,

    #[serde(default)]
    pub checked: Option<bool>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category_id: category_id.into(),
            checked: None,
        }
    }
}

/// Partial update for an item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub category_id: Option<String>,

    #[serde(default)]
    pub checked: Option<bool>,
}

impl ItemUpdate {
    /// Update that only flips the checked flag
    pub fn checked(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Default::default()
        }
    }
}
