//! State manager messages
//!
//! Commands and responses for the actor pattern.

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::oneshot;

use crate::catalog::{CategoryView, ResetOutcome};
use crate::domain::{Category, CategoryUpdate, Item, ItemUpdate, NewCategory, NewItem, Settings, SettingsUpdate};
use crate::error::TrackerResult;
use crate::scheduler::ResetTrigger;

/// Response from state operations
pub type StateResponse<T> = TrackerResult<T>;

type Reply<T> = oneshot::Sender<StateResponse<T>>;

/// A reset performed because a due check passed
#[derive(Debug, Clone)]
pub struct DueReset {
    pub outcome: ResetOutcome,
    /// Settings as of the reset, for notification gating
    pub settings: Settings,
}

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    // Category operations
    ListCategories {
        reply: Reply<Vec<Category>>,
    },
    GetCategory {
        id: String,
        reply: Reply<Option<Category>>,
    },
    CreateCategory {
        input: NewCategory,
        reply: Reply<Category>,
    },
    UpdateCategory {
        id: String,
        update: CategoryUpdate,
        reply: Reply<Category>,
    },
    DeleteCategory {
        id: String,
        reply: Reply<usize>,
    },
    DeleteAllCategories {
        reply: Reply<usize>,
    },
    CategoryViews {
        reply: Reply<Vec<CategoryView>>,
    },

    // Item operations
    ListItems {
        reply: Reply<Vec<Item>>,
    },
    ListItemsByCategory {
        category_id: String,
        reply: Reply<Vec<Item>>,
    },
    GetItem {
        id: String,
        reply: Reply<Option<Item>>,
    },
    CreateItem {
        input: NewItem,
        reply: Reply<Item>,
    },
    UpdateItem {
        id: String,
        update: ItemUpdate,
        reply: Reply<Item>,
    },
    DeleteItem {
        id: String,
        reply: Reply<()>,
    },
    DeleteAllItems {
        reply: Reply<usize>,
    },
    SetCategoryChecked {
        category_id: String,
        checked: bool,
        reply: Reply<usize>,
    },

    // Settings
    GetSettings {
        reply: Reply<Settings>,
    },
    UpdateSettings {
        update: SettingsUpdate,
        reply: Reply<Settings>,
    },

    // Reset
    Reset {
        today: NaiveDate,
        reply: Reply<ResetOutcome>,
    },
    /// Due check and reset as one serialized step
    ResetIfDue {
        now: NaiveDateTime,
        trigger: ResetTrigger,
        reply: Reply<Option<DueReset>>,
    },

    // Shutdown
    Shutdown,
}
