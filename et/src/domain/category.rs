//! Category record and the Unsorted sentinel

use serde::{Deserialize, Serialize};

use super::id::{generate_id, now_ms};

/// Fixed ID of the Unsorted sentinel category
pub const UNSORTED_ID: &str = "unsorted";

/// Reserved display name of the Unsorted sentinel
pub const UNSORTED_NAME: &str = "Unsorted";

/// Color given to the Unsorted sentinel when it is created
pub const UNSORTED_COLOR: &str = "#95a5a6";

/// Icon used when a category is created without one
pub const DEFAULT_ICON: &str = "box";

/// Color used when a category is created without one
pub const DEFAULT_COLOR: &str = "blue";

/// A named group of checklist items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    pub id: String,

    /// Display name, unique under case-insensitive comparison
    pub name: String,

    /// Icon name
    pub icon: String,

    /// CSS color (named or hex)
    pub color: String,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

impl Category {
    /// Create a new category with a generated ID
    pub fn new(name: impl Into<String>, icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            created_at: now_ms(),
        }
    }

    /// The Unsorted sentinel, as created lazily when an item would be orphaned
    pub fn unsorted() -> Self {
        Self {
            id: UNSORTED_ID.to_string(),
            name: UNSORTED_NAME.to_string(),
            icon: DEFAULT_ICON.to_string(),
            color: UNSORTED_COLOR.to_string(),
            created_at: now_ms(),
        }
    }

    /// Check if this is the Unsorted sentinel
    pub fn is_unsorted(&self) -> bool {
        self.id == UNSORTED_ID
    }

    /// Case-insensitive name comparison used for uniqueness checks
    pub fn name_matches(&self, name: &str) -> bool {
        names_collide(&self.name, name)
    }
}

/// Case-insensitive name collision
pub fn names_collide(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Sort categories for display: Unsorted first, then by name (case-sensitive)
pub fn sort_for_listing(categories: &mut [Category]) {
    categories.sort_by(|a, b| match (a.is_unsorted(), b.is_unsorted()) {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });
}

/// Input for creating a category
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    /// Missing deserializes as empty and is rejected by validation
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub color: Option<String>,
}

impl NewCategory {
    /// Create input with just a name; icon and color fall back to defaults
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Partial update for a category
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub color: Option<String>,
}
