//! Domain types for the essentials tracker
//!
//! Core records: Category, Item and the singleton Settings.
//! Every item references an existing category or the Unsorted sentinel.

mod category;
mod id;
mod item;
mod settings;

pub use category::{
    Category, CategoryUpdate, DEFAULT_COLOR, DEFAULT_ICON, NewCategory, UNSORTED_COLOR, UNSORTED_ID, UNSORTED_NAME,
    names_collide, sort_for_listing,
};
pub use id::{generate_id, now_ms};
pub use item::{Item, ItemUpdate, NewItem};
pub use settings::{
    NotificationTime, Settings, SettingsUpdate, Theme, format_clock, format_countdown, format_date,
};
