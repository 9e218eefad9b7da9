//! Persistence backends
//!
//! A [`Store`] holds categories, items and the settings singleton. Reads are
//! plain snapshots; every mutation goes through [`Store::commit`], which applies
//! a batch of [`StoreOp`]s atomically so that no reader ever observes an item
//! pointing at a category removed in the same batch.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::domain::{Category, Item, Settings};
use crate::error::StoreError;

/// A single mutation inside a committed batch
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    /// Insert or replace a category, keeping its listing position on replace
    PutCategory(Category),
    DeleteCategory(String),
    DeleteAllCategories,
    /// Insert or replace an item, keeping its position on replace
    PutItem(Item),
    DeleteItem(String),
    DeleteAllItems,
    /// Move items to `to`; `from: None` moves every item
    ReassignItems { from: Option<String>, to: String },
    /// Clear the checked flag on every item
    ResetChecked,
    PutSettings(Settings),
}

/// Storage backend for the tracker's records
pub trait Store: Send {
    /// All categories in insertion order
    fn categories(&self) -> Result<Vec<Category>, StoreError>;

    /// All items in insertion order
    fn items(&self) -> Result<Vec<Item>, StoreError>;

    /// The settings singleton (defaults if never written)
    fn settings(&self) -> Result<Settings, StoreError>;

    /// Whether the settings singleton has ever been written
    fn has_settings(&self) -> Result<bool, StoreError>;

    /// Apply every op or none of them
    fn commit(&mut self, ops: Vec<StoreOp>) -> Result<(), StoreError>;

    /// Look up one category by ID
    fn category(&self, id: &str) -> Result<Option<Category>, StoreError> {
        Ok(self.categories()?.into_iter().find(|c| c.id == id))
    }

    /// Look up one item by ID
    fn item(&self, id: &str) -> Result<Option<Item>, StoreError> {
        Ok(self.items()?.into_iter().find(|i| i.id == id))
    }

    /// Items filed under a category
    fn items_in(&self, category_id: &str) -> Result<Vec<Item>, StoreError> {
        Ok(self
            .items()?
            .into_iter()
            .filter(|i| i.belongs_to(category_id))
            .collect())
    }
}
