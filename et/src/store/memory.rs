//! In-memory store

use tracing::debug;

use crate::domain::{Category, Item, Settings};
use crate::error::StoreError;

use super::{Store, StoreOp};

#[derive(Debug, Clone, Default)]
struct Snapshot {
    categories: Vec<Category>,
    items: Vec<Item>,
    settings: Option<Settings>,
}

impl Snapshot {
    fn apply(&mut self, op: StoreOp) {
        match op {
            StoreOp::PutCategory(category) => match self.categories.iter_mut().find(|c| c.id == category.id) {
                Some(existing) => *existing = category,
                None => self.categories.push(category),
            },
            StoreOp::DeleteCategory(id) => self.categories.retain(|c| c.id != id),
            StoreOp::DeleteAllCategories => self.categories.clear(),
            StoreOp::PutItem(item) => match self.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => *existing = item,
                None => self.items.push(item),
            },
            StoreOp::DeleteItem(id) => self.items.retain(|i| i.id != id),
            StoreOp::DeleteAllItems => self.items.clear(),
            StoreOp::ReassignItems { from, to } => {
                for item in &mut self.items {
                    if from.as_deref().is_none_or(|from| item.belongs_to(from)) {
                        item.category_id = to.clone();
                    }
                }
            }
            StoreOp::ResetChecked => {
                for item in &mut self.items {
                    item.checked = false;
                }
            }
            StoreOp::PutSettings(settings) => self.settings = Some(settings),
        }
    }
}

/// Volatile store; contents live for the process lifetime only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Snapshot,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.state.categories.clone())
    }

    fn items(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.state.items.clone())
    }

    fn settings(&self) -> Result<Settings, StoreError> {
        Ok(self.state.settings.clone().unwrap_or_default())
    }

    fn has_settings(&self) -> Result<bool, StoreError> {
        Ok(self.state.settings.is_some())
    }

    fn commit(&mut self, ops: Vec<StoreOp>) -> Result<(), StoreError> {
        debug!(op_count = ops.len(), "MemoryStore::commit: called");
        let mut staged = self.state.clone();
        for op in ops {
            staged.apply(op);
        }
        self.state = staged;
        Ok(())
    }
}
