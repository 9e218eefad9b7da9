//! StateManager - actor that owns the Catalog
//!
//! Processes commands via channels so the scheduler tick and HTTP requests
//! share one serialization point. Commands are handled in arrival order.

use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::catalog::{Catalog, CategoryView, ResetOutcome};
use crate::config::{StorageBackend, StorageConfig};
use crate::domain::{Category, CategoryUpdate, Item, ItemUpdate, NewCategory, NewItem, Settings, SettingsUpdate};
use crate::error::TrackerError;
use crate::scheduler::ResetTrigger;
use crate::store::{MemoryStore, SqliteStore, Store};

use super::messages::{DueReset, StateCommand, StateResponse};

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn a new StateManager actor owning `catalog`
    pub fn spawn(catalog: Catalog) -> Self {
        debug!("spawn: called");
        let (tx, rx) = mpsc::channel(256);

        // Spawn the actor task
        tokio::spawn(actor_loop(catalog, rx));

        info!("StateManager spawned");

        Self { tx }
    }

    /// Open the configured store and spawn the actor over it
    pub fn open(config: &StorageConfig) -> eyre::Result<Self> {
        debug!(backend = ?config.backend, path = %config.path.display(), "open: called");
        let store: Box<dyn Store> = match config.backend {
            StorageBackend::Memory => Box::new(MemoryStore::new()),
            StorageBackend::Sqlite => Box::new(SqliteStore::open(&config.path)?),
        };
        let catalog = Catalog::open(store, config.seed_defaults)?;
        Ok(Self::spawn(catalog))
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<StateResponse<T>>) -> StateCommand,
    ) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| TrackerError::ChannelClosed)?;
        reply_rx.await.map_err(|_| TrackerError::ChannelClosed)?
    }

    // === Category operations ===

    /// List categories in display order
    pub async fn list_categories(&self) -> StateResponse<Vec<Category>> {
        debug!("list_categories: called");
        self.request(|reply| StateCommand::ListCategories { reply }).await
    }

    /// Get a category by ID
    pub async fn get_category(&self, id: &str) -> StateResponse<Option<Category>> {
        debug!(%id, "get_category: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::GetCategory { id, reply }).await
    }

    pub async fn create_category(&self, input: NewCategory) -> StateResponse<Category> {
        debug!(name = %input.name, "create_category: called");
        self.request(|reply| StateCommand::CreateCategory { input, reply })
            .await
    }

    pub async fn update_category(&self, id: &str, update: CategoryUpdate) -> StateResponse<Category> {
        debug!(%id, "update_category: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::UpdateCategory { id, update, reply })
            .await
    }

    /// Delete a category; returns the number of items moved to Unsorted
    pub async fn delete_category(&self, id: &str) -> StateResponse<usize> {
        debug!(%id, "delete_category: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::DeleteCategory { id, reply }).await
    }

    pub async fn delete_all_categories(&self) -> StateResponse<usize> {
        debug!("delete_all_categories: called");
        self.request(|reply| StateCommand::DeleteAllCategories { reply })
            .await
    }

    /// Categories with their items and progress
    pub async fn category_views(&self) -> StateResponse<Vec<CategoryView>> {
        debug!("category_views: called");
        self.request(|reply| StateCommand::CategoryViews { reply }).await
    }

    // === Item operations ===

    pub async fn list_items(&self) -> StateResponse<Vec<Item>> {
        debug!("list_items: called");
        self.request(|reply| StateCommand::ListItems { reply }).await
    }

    pub async fn list_items_by_category(&self, category_id: &str) -> StateResponse<Vec<Item>> {
        debug!(%category_id, "list_items_by_category: called");
        let category_id = category_id.to_string();
        self.request(|reply| StateCommand::ListItemsByCategory { category_id, reply })
            .await
    }

    pub async fn get_item(&self, id: &str) -> StateResponse<Option<Item>> {
        debug!(%id, "get_item: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::GetItem { id, reply }).await
    }

    pub async fn create_item(&self, input: NewItem) -> StateResponse<Item> {
        debug!(name = %input.name, category_id = %input.category_id, "create_item: called");
        self.request(|reply| StateCommand::CreateItem { input, reply }).await
    }

    pub async fn update_item(&self, id: &str, update: ItemUpdate) -> StateResponse<Item> {
        debug!(%id, "update_item: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::UpdateItem { id, update, reply })
            .await
    }

    pub async fn delete_item(&self, id: &str) -> StateResponse<()> {
        debug!(%id, "delete_item: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::DeleteItem { id, reply }).await
    }

    pub async fn delete_all_items(&self) -> StateResponse<usize> {
        debug!("delete_all_items: called");
        self.request(|reply| StateCommand::DeleteAllItems { reply }).await
    }

    /// Check or uncheck every item in a category
    pub async fn set_category_checked(&self, category_id: &str, checked: bool) -> StateResponse<usize> {
        debug!(%category_id, checked, "set_category_checked: called");
        let category_id = category_id.to_string();
        self.request(|reply| StateCommand::SetCategoryChecked {
            category_id,
            checked,
            reply,
        })
        .await
    }

    // === Settings ===

    pub async fn get_settings(&self) -> StateResponse<Settings> {
        debug!("get_settings: called");
        self.request(|reply| StateCommand::GetSettings { reply }).await
    }

    pub async fn update_settings(&self, update: SettingsUpdate) -> StateResponse<Settings> {
        debug!("update_settings: called");
        self.request(|reply| StateCommand::UpdateSettings { update, reply })
            .await
    }

    // === Reset ===

    /// Reset unconditionally (manual "reset now")
    pub async fn reset(&self, today: NaiveDate) -> StateResponse<ResetOutcome> {
        debug!(%today, "reset: called");
        self.request(|reply| StateCommand::Reset { today, reply }).await
    }

    /// Reset only if `trigger` says one is due at `now`
    pub async fn reset_if_due(&self, now: NaiveDateTime, trigger: ResetTrigger) -> StateResponse<Option<DueReset>> {
        debug!(%now, ?trigger, "reset_if_due: called");
        self.request(|reply| StateCommand::ResetIfDue { now, trigger, reply })
            .await
    }

    /// Shutdown the StateManager
    pub async fn shutdown(&self) -> StateResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| TrackerError::ChannelClosed)
    }
}

fn reset_if_due(catalog: &mut Catalog, now: NaiveDateTime, trigger: ResetTrigger) -> StateResponse<Option<DueReset>> {
    let settings = catalog.settings()?;
    if !trigger.is_due(now, &settings) {
        return Ok(None);
    }
    let outcome = catalog.reset(now.date())?;
    Ok(Some(DueReset { outcome, settings }))
}

/// Actor loop that processes commands
async fn actor_loop(mut catalog: Catalog, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("actor_loop: called");
    debug!("StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            // Category operations
            StateCommand::ListCategories { reply } => {
                debug!("actor_loop: ListCategories command");
                let _ = reply.send(catalog.list_categories());
            }

            StateCommand::GetCategory { id, reply } => {
                debug!(%id, "actor_loop: GetCategory command");
                let _ = reply.send(catalog.category(&id));
            }

            StateCommand::CreateCategory { input, reply } => {
                debug!(name = %input.name, "actor_loop: CreateCategory command");
                let _ = reply.send(catalog.create_category(input));
            }

            StateCommand::UpdateCategory { id, update, reply } => {
                debug!(%id, "actor_loop: UpdateCategory command");
                let _ = reply.send(catalog.update_category(&id, update));
            }

            StateCommand::DeleteCategory { id, reply } => {
                debug!(%id, "actor_loop: DeleteCategory command");
                let _ = reply.send(catalog.delete_category(&id));
            }

            StateCommand::DeleteAllCategories { reply } => {
                debug!("actor_loop: DeleteAllCategories command");
                let _ = reply.send(catalog.delete_all_categories());
            }

            StateCommand::CategoryViews { reply } => {
                debug!("actor_loop: CategoryViews command");
                let _ = reply.send(catalog.category_views());
            }

            // Item operations
            StateCommand::ListItems { reply } => {
                debug!("actor_loop: ListItems command");
                let _ = reply.send(catalog.list_items());
            }

            StateCommand::ListItemsByCategory { category_id, reply } => {
                debug!(%category_id, "actor_loop: ListItemsByCategory command");
                let _ = reply.send(catalog.items_by_category(&category_id));
            }

            StateCommand::GetItem { id, reply } => {
                debug!(%id, "actor_loop: GetItem command");
                let _ = reply.send(catalog.item(&id));
            }

            StateCommand::CreateItem { input, reply } => {
                debug!(name = %input.name, "actor_loop: CreateItem command");
                let _ = reply.send(catalog.create_item(input));
            }

            StateCommand::UpdateItem { id, update, reply } => {
                debug!(%id, "actor_loop: UpdateItem command");
                let _ = reply.send(catalog.update_item(&id, update));
            }

            StateCommand::DeleteItem { id, reply } => {
                debug!(%id, "actor_loop: DeleteItem command");
                let _ = reply.send(catalog.delete_item(&id));
            }

            StateCommand::DeleteAllItems { reply } => {
                debug!("actor_loop: DeleteAllItems command");
                let _ = reply.send(catalog.delete_all_items());
            }

            StateCommand::SetCategoryChecked {
                category_id,
                checked,
                reply,
            } => {
                debug!(%category_id, checked, "actor_loop: SetCategoryChecked command");
                let _ = reply.send(catalog.set_category_checked(&category_id, checked));
            }

            // Settings
            StateCommand::GetSettings { reply } => {
                debug!("actor_loop: GetSettings command");
                let _ = reply.send(catalog.settings());
            }

            StateCommand::UpdateSettings { update, reply } => {
                debug!("actor_loop: UpdateSettings command");
                let _ = reply.send(catalog.update_settings(update));
            }

            // Reset
            StateCommand::Reset { today, reply } => {
                debug!(%today, "actor_loop: Reset command");
                let _ = reply.send(catalog.reset(today));
            }

            StateCommand::ResetIfDue { now, trigger, reply } => {
                debug!(%now, ?trigger, "actor_loop: ResetIfDue command");
                let _ = reply.send(reset_if_due(&mut catalog, now, trigger));
            }

            StateCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}
