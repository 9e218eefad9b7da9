//! Category/item consistency rules
//!
//! [`Catalog`] owns a [`Store`] and is the only path through which categories,
//! items and settings change. It guarantees:
//!
//! - every item references an existing category or the Unsorted sentinel
//! - category names are unique under case-insensitive comparison
//! - the Unsorted sentinel is created lazily, never deleted or renamed directly,
//!   and dropped once no item references it
//!
//! Each operation commits a single atomic batch to the store.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{
    Category, CategoryUpdate, DEFAULT_COLOR, DEFAULT_ICON, Item, ItemUpdate, NewCategory, NewItem, Settings,
    SettingsUpdate, UNSORTED_ID, UNSORTED_NAME, names_collide, sort_for_listing,
};
use crate::error::{TrackerError, TrackerResult};
use crate::store::{Store, StoreOp};

/// Categories and items created on first start
const DEFAULT_DATA: &[(&str, &str, &str, &[&str])] = &[
    ("Devices", "laptop", "blue", &["Laptop", "Phone Charger", "Headphones"]),
    ("Food", "utensils", "green", &["Rice", "Curry", "Snacks", "Water Bottle"]),
    ("Keys", "key", "yellow", &["House Keys", "Car Keys", "Office Keys"]),
    ("Miscellaneous", "box", "purple", &["Wallet", "Sunglasses"]),
];

/// Result of clearing every item's checked flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    /// Items that were checked before the reset
    pub cleared: usize,

    /// The recorded last reset date after the reset
    pub last_reset_date: NaiveDate,
}

/// A category together with its items, in display order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub category: Category,
    pub items: Vec<Item>,
    /// True when the category has items and all of them are checked
    pub all_checked: bool,
}

/// Consistency manager over a storage backend
pub struct Catalog {
    store: Box<dyn Store>,
}

impl Catalog {
    /// Wrap a store, writing the settings singleton (and optional seed data) on first use
    pub fn open(store: Box<dyn Store>, seed_defaults: bool) -> TrackerResult<Self> {
        debug!(seed_defaults, "Catalog::open: called");
        let mut catalog = Self { store };

        if !catalog.store.has_settings()? {
            let mut ops = vec![StoreOp::PutSettings(Settings::default())];
            if seed_defaults && catalog.store.categories()?.is_empty() && catalog.store.items()?.is_empty() {
                ops.extend(default_data_ops());
            }
            catalog.store.commit(ops)?;
            info!(seeded = seed_defaults, "Initialized fresh store");
        }

        Ok(catalog)
    }

    // === Categories ===

    /// Categories in display order: Unsorted first, then by name.
    ///
    /// Drops the Unsorted sentinel if no item references it.
    pub fn list_categories(&mut self) -> TrackerResult<Vec<Category>> {
        debug!("Catalog::list_categories: called");
        self.collect_unsorted()?;
        let mut categories = self.store.categories()?;
        sort_for_listing(&mut categories);
        Ok(categories)
    }

    /// Look up a category by ID
    pub fn category(&self, id: &str) -> TrackerResult<Option<Category>> {
        Ok(self.store.category(id)?)
    }

    /// Create a category with a unique (case-insensitive) name
    pub fn create_category(&mut self, input: NewCategory) -> TrackerResult<Category> {
        debug!(name = %input.name, "Catalog::create_category: called");
        let name = required_name("name", &input.name)?;
        self.ensure_name_available(&name, None)?;

        let category = Category::new(
            name,
            non_empty_or(input.icon, DEFAULT_ICON),
            non_empty_or(input.color, DEFAULT_COLOR),
        );
        self.store.commit(vec![StoreOp::PutCategory(category.clone())])?;

        info!(id = %category.id, name = %category.name, "Created category");
        Ok(category)
    }

    /// Apply a partial update to a category.
    ///
    /// The Unsorted sentinel keeps its name; its color and icon may change.
    pub fn update_category(&mut self, id: &str, update: CategoryUpdate) -> TrackerResult<Category> {
        debug!(%id, ?update, "Catalog::update_category: called");
        let mut category = self
            .store
            .category(id)?
            .ok_or_else(|| TrackerError::category_not_found(id))?;

        if let Some(raw) = update.name.as_deref() {
            let name = required_name("name", raw)?;
            if category.is_unsorted() {
                if name != UNSORTED_NAME {
                    return Err(TrackerError::ProtectedEntity(
                        "the Unsorted category cannot be renamed".to_string(),
                    ));
                }
            } else {
                self.ensure_name_available(&name, Some(id))?;
                category.name = name;
            }
        }
        if let Some(icon) = update.icon.filter(|s| !s.trim().is_empty()) {
            category.icon = icon;
        }
        if let Some(color) = update.color.filter(|s| !s.trim().is_empty()) {
            category.color = color;
        }

        self.store.commit(vec![StoreOp::PutCategory(category.clone())])?;
        Ok(category)
    }

    /// Delete a category, moving its items to Unsorted. Returns the number of items moved.
    pub fn delete_category(&mut self, id: &str) -> TrackerResult<usize> {
        debug!(%id, "Catalog::delete_category: called");
        if id == UNSORTED_ID {
            return Err(TrackerError::ProtectedEntity(
                "the Unsorted category cannot be deleted".to_string(),
            ));
        }
        if self.store.category(id)?.is_none() {
            return Err(TrackerError::category_not_found(id));
        }

        let moved = self.store.items_in(id)?.len();
        let mut ops = Vec::new();
        if moved > 0 {
            ops.extend(self.unsorted_op()?);
            ops.push(StoreOp::ReassignItems {
                from: Some(id.to_string()),
                to: UNSORTED_ID.to_string(),
            });
        }
        ops.push(StoreOp::DeleteCategory(id.to_string()));
        self.store.commit(ops)?;

        info!(%id, moved, "Deleted category");
        Ok(moved)
    }

    /// Delete every category, moving all items to a fresh Unsorted. Returns the number of categories removed.
    pub fn delete_all_categories(&mut self) -> TrackerResult<usize> {
        debug!("Catalog::delete_all_categories: called");
        let removed = self.store.categories()?.iter().filter(|c| !c.is_unsorted()).count();
        let has_items = !self.store.items()?.is_empty();

        let mut ops = vec![StoreOp::DeleteAllCategories];
        if has_items {
            ops.push(StoreOp::PutCategory(Category::unsorted()));
            ops.push(StoreOp::ReassignItems {
                from: None,
                to: UNSORTED_ID.to_string(),
            });
        }
        self.store.commit(ops)?;

        info!(removed, "Deleted all categories");
        Ok(removed)
    }

    /// Every category with its items, in display order
    pub fn category_views(&mut self) -> TrackerResult<Vec<CategoryView>> {
        let categories = self.list_categories()?;
        let items = self.store.items()?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let items: Vec<Item> = items.iter().filter(|i| i.belongs_to(&category.id)).cloned().collect();
                let all_checked = !items.is_empty() && items.iter().all(|i| i.checked);
                CategoryView {
                    category,
                    items,
                    all_checked,
                }
            })
            .collect())
    }

    // === Items ===

    /// All items in creation order
    pub fn list_items(&self) -> TrackerResult<Vec<Item>> {
        Ok(self.store.items()?)
    }

    /// Items filed under a category; unknown IDs yield an empty list
    pub fn items_by_category(&self, category_id: &str) -> TrackerResult<Vec<Item>> {
        Ok(self.store.items_in(category_id)?)
    }

    /// Look up an item by ID
    pub fn item(&self, id: &str) -> TrackerResult<Option<Item>> {
        Ok(self.store.item(id)?)
    }

    /// Create an item, creating the Unsorted sentinel if the item targets it
    pub fn create_item(&mut self, input: NewItem) -> TrackerResult<Item> {
        debug!(name = %input.name, category_id = %input.category_id, "Catalog::create_item: called");
        let name = required_name("name", &input.name)?;
        let category_id = input.category_id.trim().to_string();
        let mut ops = self.category_target_ops(&category_id)?;

        let mut item = Item::new(name, category_id);
        item.checked = input.checked.unwrap_or(false);
        ops.push(StoreOp::PutItem(item.clone()));
        self.store.commit(ops)?;

        info!(id = %item.id, category_id = %item.category_id, "Created item");
        Ok(item)
    }

    /// Apply a partial update to an item
    pub fn update_item(&mut self, id: &str, update: ItemUpdate) -> TrackerResult<Item> {
        debug!(%id, ?update, "Catalog::update_item: called");
        let mut item = self.store.item(id)?.ok_or_else(|| TrackerError::item_not_found(id))?;
        let mut ops = Vec::new();

        if let Some(raw) = update.name.as_deref() {
            item.name = required_name("name", raw)?;
        }
        if let Some(raw) = update.category_id.as_deref() {
            let category_id = raw.trim().to_string();
            if category_id != item.category_id {
                ops.extend(self.category_target_ops(&category_id)?);
                item.category_id = category_id;
            }
        }
        if let Some(checked) = update.checked {
            item.checked = checked;
        }

        ops.push(StoreOp::PutItem(item.clone()));
        self.store.commit(ops)?;
        Ok(item)
    }

    /// Delete an item
    pub fn delete_item(&mut self, id: &str) -> TrackerResult<()> {
        debug!(%id, "Catalog::delete_item: called");
        if self.store.item(id)?.is_none() {
            return Err(TrackerError::item_not_found(id));
        }
        self.store.commit(vec![StoreOp::DeleteItem(id.to_string())])?;
        Ok(())
    }

    /// Delete every item. Returns the number removed.
    pub fn delete_all_items(&mut self) -> TrackerResult<usize> {
        debug!("Catalog::delete_all_items: called");
        let removed = self.store.items()?.len();
        self.store.commit(vec![StoreOp::DeleteAllItems])?;
        info!(removed, "Deleted all items");
        Ok(removed)
    }

    /// Check or uncheck every item in a category. Returns the number of items touched.
    pub fn set_category_checked(&mut self, category_id: &str, checked: bool) -> TrackerResult<usize> {
        debug!(%category_id, checked, "Catalog::set_category_checked: called");
        if self.store.category(category_id)?.is_none() {
            return Err(TrackerError::category_not_found(category_id));
        }

        let ops: Vec<StoreOp> = self
            .store
            .items_in(category_id)?
            .into_iter()
            .map(|mut item| {
                item.checked = checked;
                StoreOp::PutItem(item)
            })
            .collect();
        let touched = ops.len();
        self.store.commit(ops)?;
        Ok(touched)
    }

    // === Settings & reset ===

    /// The settings singleton
    pub fn settings(&self) -> TrackerResult<Settings> {
        Ok(self.store.settings()?)
    }

    /// Apply a partial settings update (never touches the last reset date)
    pub fn update_settings(&mut self, update: SettingsUpdate) -> TrackerResult<Settings> {
        debug!(?update, "Catalog::update_settings: called");
        let mut settings = self.store.settings()?;
        settings.apply(update)?;
        self.store.commit(vec![StoreOp::PutSettings(settings.clone())])?;
        Ok(settings)
    }

    /// Clear every item's checked flag and record `today` as the last reset date.
    ///
    /// Both writes land in one batch; on failure neither is applied, so the
    /// reset is retried on the next attempt. The recorded date never moves backwards.
    pub fn reset(&mut self, today: NaiveDate) -> TrackerResult<ResetOutcome> {
        debug!(%today, "Catalog::reset: called");
        let cleared = self.store.items()?.iter().filter(|i| i.checked).count();

        let mut settings = self.store.settings()?;
        let last_reset_date = settings.last_reset_date.map_or(today, |prev| prev.max(today));
        settings.last_reset_date = Some(last_reset_date);

        self.store
            .commit(vec![StoreOp::ResetChecked, StoreOp::PutSettings(settings)])?;

        info!(cleared, %last_reset_date, "Reset all items");
        Ok(ResetOutcome {
            cleared,
            last_reset_date,
        })
    }

    // === Internals ===

    fn ensure_name_available(&self, name: &str, exclude_id: Option<&str>) -> TrackerResult<()> {
        if names_collide(name, UNSORTED_NAME) {
            return Err(TrackerError::DuplicateName(name.to_string()));
        }
        let taken = self
            .store
            .categories()?
            .iter()
            .any(|c| Some(c.id.as_str()) != exclude_id && c.name_matches(name));
        if taken {
            return Err(TrackerError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Ops needed before an item may point at `category_id`
    fn category_target_ops(&self, category_id: &str) -> TrackerResult<Vec<StoreOp>> {
        if category_id.is_empty() {
            return Err(TrackerError::validation("categoryId", "must not be empty"));
        }
        if category_id == UNSORTED_ID {
            return Ok(self.unsorted_op()?.into_iter().collect());
        }
        if self.store.category(category_id)?.is_none() {
            return Err(TrackerError::validation(
                "categoryId",
                format!("unknown category '{}'", category_id),
            ));
        }
        Ok(Vec::new())
    }

    /// Op creating the Unsorted sentinel, if it does not exist yet
    fn unsorted_op(&self) -> TrackerResult<Option<StoreOp>> {
        if self.store.category(UNSORTED_ID)?.is_some() {
            return Ok(None);
        }
        debug!("Catalog::unsorted_op: creating Unsorted sentinel");
        Ok(Some(StoreOp::PutCategory(Category::unsorted())))
    }

    /// Drop the Unsorted sentinel if nothing references it
    fn collect_unsorted(&mut self) -> TrackerResult<()> {
        if self.store.category(UNSORTED_ID)?.is_some() && self.store.items_in(UNSORTED_ID)?.is_empty() {
            debug!("Catalog::collect_unsorted: dropping empty Unsorted");
            self.store.commit(vec![StoreOp::DeleteCategory(UNSORTED_ID.to_string())])?;
        }
        Ok(())
    }
}

fn required_name(field: &str, raw: &str) -> TrackerResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TrackerError::validation(field, "must not be empty"));
    }
    Ok(name.to_string())
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn default_data_ops() -> Vec<StoreOp> {
    let mut categories = Vec::new();
    let mut items = Vec::new();
    for (name, icon, color, names) in DEFAULT_DATA {
        let category = Category::new(*name, *icon, *color);
        items.extend(
            names
                .iter()
                .map(|item| StoreOp::PutItem(Item::new(*item, category.id.clone()))),
        );
        categories.push(StoreOp::PutCategory(category));
    }
    categories.extend(items);
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn empty_catalog() -> Catalog {
        Catalog::open(Box::new(MemoryStore::new()), false).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn assert_no_dangling(catalog: &Catalog) {
        let categories = catalog.store.categories().unwrap();
        for item in catalog.list_items().unwrap() {
            assert!(
                categories.iter().any(|c| c.id == item.category_id),
                "item {} points at missing category {}",
                item.name,
                item.category_id
            );
        }
    }

    #[test]
    fn test_open_seeds_defaults_once() {
        let mut catalog = Catalog::open(Box::new(MemoryStore::new()), true).unwrap();
        let names: Vec<String> = catalog.list_categories().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Devices", "Food", "Keys", "Miscellaneous"]);
        assert_eq!(catalog.list_items().unwrap().len(), 12);
        assert_no_dangling(&catalog);

        catalog.delete_all_items().unwrap();
        catalog.delete_all_categories().unwrap();

        let catalog = Catalog::open(catalog.store, true).unwrap();
        assert!(catalog.list_items().unwrap().is_empty());
    }

    #[test]
    fn test_create_category_defaults() {
        let mut catalog = empty_catalog();
        let category = catalog.create_category(NewCategory::named("  Gym  ")).unwrap();
        assert_eq!(category.name, "Gym");
        assert_eq!(category.icon, DEFAULT_ICON);
        assert_eq!(category.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_create_category_rejects_empty_name() {
        let mut catalog = empty_catalog();
        let err = catalog.create_category(NewCategory::named("   ")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_create_category_case_insensitive_duplicate() {
        let mut catalog = empty_catalog();
        catalog.create_category(NewCategory::named("Keys")).unwrap();

        let err = catalog.create_category(NewCategory::named("keys")).unwrap_err();
        assert!(matches!(err, TrackerError::DuplicateName(_)));
        assert_eq!(catalog.list_categories().unwrap().len(), 1);
    }

    #[test]
    fn test_create_category_reserved_unsorted_name() {
        let mut catalog = empty_catalog();
        let err = catalog.create_category(NewCategory::named("unsorted")).unwrap_err();
        assert!(matches!(err, TrackerError::DuplicateName(_)));
    }

    #[test]
    fn test_rename_category_duplicate_excludes_self() {
        let mut catalog = empty_catalog();
        let keys = catalog.create_category(NewCategory::named("Keys")).unwrap();
        catalog.create_category(NewCategory::named("Food")).unwrap();

        // Changing only the case of its own name is allowed
        let renamed = catalog
            .update_category(
                &keys.id,
                CategoryUpdate {
                    name: Some("KEYS".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "KEYS");

        let err = catalog
            .update_category(
                &keys.id,
                CategoryUpdate {
                    name: Some("food".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::DuplicateName(_)));
    }

    #[test]
    fn test_update_unknown_category() {
        let mut catalog = empty_catalog();
        let err = catalog.update_category("nope", CategoryUpdate::default()).unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { .. }));
    }

    #[test]
    fn test_unsorted_name_immutable_color_mutable() {
        let mut catalog = empty_catalog();
        catalog.create_item(NewItem::new("Wallet", UNSORTED_ID)).unwrap();

        let err = catalog
            .update_category(
                UNSORTED_ID,
                CategoryUpdate {
                    name: Some("Misc".to_string()),
                    color: Some("#ff0000".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::ProtectedEntity(_)));
        assert_eq!(catalog.category(UNSORTED_ID).unwrap().unwrap().color, "#95a5a6");

        let updated = catalog
            .update_category(
                UNSORTED_ID,
                CategoryUpdate {
                    color: Some("#ff0000".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, UNSORTED_NAME);
        assert_eq!(updated.color, "#ff0000");
    }

    #[test]
    fn test_create_item_auto_creates_unsorted() {
        let mut catalog = empty_catalog();
        assert!(catalog.category(UNSORTED_ID).unwrap().is_none());

        let item = catalog.create_item(NewItem::new("Wallet", UNSORTED_ID)).unwrap();
        assert_eq!(item.category_id, UNSORTED_ID);

        let unsorted = catalog.category(UNSORTED_ID).unwrap().unwrap();
        assert_eq!(unsorted.name, UNSORTED_NAME);
        assert_no_dangling(&catalog);
    }

    #[test]
    fn test_create_item_unknown_category_rejected() {
        let mut catalog = empty_catalog();
        let err = catalog.create_item(NewItem::new("Wallet", "missing")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation { ref field, .. } if field == "categoryId"));
        assert!(catalog.list_items().unwrap().is_empty());
    }

    #[test]
    fn test_create_item_missing_fields_rejected() {
        let mut catalog = empty_catalog();
        let input: NewItem = serde_json::from_str(r#"{"name": "Wallet"}"#).unwrap();
        let err = catalog.create_item(input).unwrap_err();
        assert!(matches!(err, TrackerError::Validation { ref field, .. } if field == "categoryId"));

        let input: NewItem = serde_json::from_str(r#"{"categoryId": "unsorted"}"#).unwrap();
        let err = catalog.create_item(input).unwrap_err();
        assert!(matches!(err, TrackerError::Validation { ref field, .. } if field == "name"));
        assert!(catalog.list_items().unwrap().is_empty());
    }

    #[test]
    fn test_delete_category_moves_items_to_unsorted() {
        let mut catalog = empty_catalog();
        let devices = catalog.create_category(NewCategory::named("Devices")).unwrap();
        let food = catalog.create_category(NewCategory::named("Food")).unwrap();
        let mut laptop = NewItem::new("Laptop", devices.id.clone());
        laptop.checked = Some(true);
        let laptop = catalog.create_item(laptop).unwrap();

        let moved = catalog.delete_category(&devices.id).unwrap();
        assert_eq!(moved, 1);

        let item = catalog.item(&laptop.id).unwrap().unwrap();
        assert_eq!(item.category_id, UNSORTED_ID);
        assert!(item.checked);

        let ids: Vec<String> = catalog.list_categories().unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![UNSORTED_ID.to_string(), food.id]);
        assert!(catalog.items_by_category(&devices.id).unwrap().is_empty());
        assert_no_dangling(&catalog);
    }

    #[test]
    fn test_delete_category_counts_every_item() {
        let mut catalog = empty_catalog();
        let keys = catalog.create_category(NewCategory::named("Keys")).unwrap();
        catalog.create_item(NewItem::new("Stray", UNSORTED_ID)).unwrap();
        for name in ["House", "Car", "Office"] {
            catalog.create_item(NewItem::new(name, keys.id.clone())).unwrap();
        }

        assert_eq!(catalog.delete_category(&keys.id).unwrap(), 3);
        assert_eq!(catalog.items_by_category(UNSORTED_ID).unwrap().len(), 4);
        assert_no_dangling(&catalog);
    }

    #[test]
    fn test_delete_empty_category_does_not_create_unsorted() {
        let mut catalog = empty_catalog();
        let gym = catalog.create_category(NewCategory::named("Gym")).unwrap();
        assert_eq!(catalog.delete_category(&gym.id).unwrap(), 0);
        assert!(catalog.category(UNSORTED_ID).unwrap().is_none());
    }

    #[test]
    fn test_delete_unsorted_protected() {
        let mut catalog = empty_catalog();
        catalog.create_item(NewItem::new("Wallet", UNSORTED_ID)).unwrap();

        let err = catalog.delete_category(UNSORTED_ID).unwrap_err();
        assert!(matches!(err, TrackerError::ProtectedEntity(_)));
        assert!(catalog.category(UNSORTED_ID).unwrap().is_some());
    }

    #[test]
    fn test_delete_unknown_category() {
        let mut catalog = empty_catalog();
        let err = catalog.delete_category("nope").unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { .. }));
    }

    #[test]
    fn test_delete_all_categories() {
        let mut catalog = Catalog::open(Box::new(MemoryStore::new()), true).unwrap();
        let removed = catalog.delete_all_categories().unwrap();
        assert_eq!(removed, 4);

        let categories = catalog.list_categories().unwrap();
        assert_eq!(categories.len(), 1);
        assert!(categories[0].is_unsorted());
        assert_eq!(catalog.items_by_category(UNSORTED_ID).unwrap().len(), 12);
        assert_no_dangling(&catalog);
    }

    #[test]
    fn test_delete_all_categories_without_items() {
        let mut catalog = empty_catalog();
        catalog.create_category(NewCategory::named("Gym")).unwrap();
        catalog.delete_all_categories().unwrap();
        assert!(catalog.list_categories().unwrap().is_empty());
    }

    #[test]
    fn test_listing_collects_empty_unsorted() {
        let mut catalog = empty_catalog();
        let item = catalog.create_item(NewItem::new("Wallet", UNSORTED_ID)).unwrap();
        assert_eq!(catalog.list_categories().unwrap().len(), 1);

        catalog.delete_item(&item.id).unwrap();
        assert!(catalog.list_categories().unwrap().is_empty());
        assert!(catalog.category(UNSORTED_ID).unwrap().is_none());
    }

    #[test]
    fn test_move_item_between_categories() {
        let mut catalog = empty_catalog();
        let keys = catalog.create_category(NewCategory::named("Keys")).unwrap();
        let item = catalog.create_item(NewItem::new("Car Keys", UNSORTED_ID)).unwrap();

        let moved = catalog
            .update_item(
                &item.id,
                ItemUpdate {
                    category_id: Some(keys.id.clone()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(moved.category_id, keys.id);

        let err = catalog
            .update_item(
                &item.id,
                ItemUpdate {
                    category_id: Some("missing".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation { .. }));

        // Unsorted has no items left and disappears from the listing
        let names: Vec<String> = catalog.list_categories().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Keys"]);
    }

    #[test]
    fn test_update_item_rename_validation() {
        let mut catalog = empty_catalog();
        let item = catalog.create_item(NewItem::new("Wallet", UNSORTED_ID)).unwrap();

        let err = catalog
            .update_item(
                &item.id,
                ItemUpdate {
                    name: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation { .. }));

        let err = catalog.update_item("nope", ItemUpdate::checked(true)).unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { .. }));
    }

    #[test]
    fn test_set_category_checked() {
        let mut catalog = empty_catalog();
        let food = catalog.create_category(NewCategory::named("Food")).unwrap();
        catalog.create_item(NewItem::new("Rice", food.id.clone())).unwrap();
        catalog.create_item(NewItem::new("Curry", food.id.clone())).unwrap();
        catalog.create_item(NewItem::new("Wallet", UNSORTED_ID)).unwrap();

        assert_eq!(catalog.set_category_checked(&food.id, true).unwrap(), 2);

        let views = catalog.category_views().unwrap();
        let food_view = views.iter().find(|v| v.category.id == food.id).unwrap();
        assert!(food_view.all_checked);
        let unsorted_view = views.iter().find(|v| v.category.is_unsorted()).unwrap();
        assert!(!unsorted_view.all_checked);
    }

    #[test]
    fn test_reset_clears_checked_and_records_date() {
        let mut catalog = empty_catalog();
        let mut input = NewItem::new("Wallet", UNSORTED_ID);
        input.checked = Some(true);
        catalog.create_item(input).unwrap();

        let outcome = catalog.reset(date("2026-03-02")).unwrap();
        assert_eq!(outcome.cleared, 1);
        assert_eq!(outcome.last_reset_date, date("2026-03-02"));
        assert!(catalog.list_items().unwrap().iter().all(|i| !i.checked));
        assert_eq!(catalog.settings().unwrap().last_reset_date, Some(date("2026-03-02")));
    }

    #[test]
    fn test_reset_twice_same_day_is_idempotent() {
        let mut catalog = Catalog::open(Box::new(MemoryStore::new()), true).unwrap();
        let items = catalog.list_items().unwrap();
        catalog.update_item(&items[0].id, ItemUpdate::checked(true)).unwrap();

        let first = catalog.reset(date("2026-03-02")).unwrap();
        let after_first = catalog.list_items().unwrap();
        let second = catalog.reset(date("2026-03-02")).unwrap();

        assert_eq!(first.cleared, 1);
        assert_eq!(second.cleared, 0);
        assert_eq!(second.last_reset_date, first.last_reset_date);
        assert_eq!(catalog.list_items().unwrap(), after_first);
    }

    #[test]
    fn test_reset_date_never_moves_backwards() {
        let mut catalog = empty_catalog();
        catalog.reset(date("2026-03-05")).unwrap();
        let outcome = catalog.reset(date("2026-03-01")).unwrap();
        assert_eq!(outcome.last_reset_date, date("2026-03-05"));
    }

    #[test]
    fn test_update_settings_does_not_touch_items() {
        let mut catalog = empty_catalog();
        let mut input = NewItem::new("Wallet", UNSORTED_ID);
        input.checked = Some(true);
        catalog.create_item(input).unwrap();
        let before = catalog.list_items().unwrap();

        let settings = catalog
            .update_settings(SettingsUpdate {
                animations: Some(true),
                notifications: Some(false),
                ..Default::default()
            })
            .unwrap();
        assert!(settings.animations);
        assert!(!settings.notifications);
        assert_eq!(catalog.list_items().unwrap(), before);
        assert!(settings.last_reset_date.is_none());
    }
}
