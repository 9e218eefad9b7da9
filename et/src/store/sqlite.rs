//! SQLite-backed store

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Transaction, params};
use tracing::{debug, info};

use crate::domain::{Category, Item, Settings};
use crate::error::StoreError;

use super::{Store, StoreOp};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    icon        TEXT NOT NULL,
    color       TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS items (
    id           TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    category_id  TEXT NOT NULL,
    checked      INTEGER NOT NULL DEFAULT 0,
    created_at   INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_items_category ON items(category_id);
CREATE TABLE IF NOT EXISTS settings (
    id    INTEGER PRIMARY KEY CHECK (id = 1),
    data  TEXT NOT NULL
);
"#;

/// Durable store in a single SQLite file
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "SqliteStore::open: called");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self::init(conn)?;
        info!(path = %path.display(), "Opened SQLite store");
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

fn apply(tx: &Transaction<'_>, op: StoreOp) -> Result<(), StoreError> {
    match op {
        StoreOp::PutCategory(c) => {
            tx.execute(
                "INSERT INTO categories (id, name, icon, color, created_at) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET name = excluded.name, icon = excluded.icon, color = excluded.color",
                params![c.id, c.name, c.icon, c.color, c.created_at],
            )?;
        }
        StoreOp::DeleteCategory(id) => {
            tx.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        }
        StoreOp::DeleteAllCategories => {
            tx.execute("DELETE FROM categories", [])?;
        }
        StoreOp::PutItem(i) => {
            tx.execute(
                "INSERT INTO items (id, name, category_id, checked, created_at) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET name = excluded.name, category_id = excluded.category_id,
                 checked = excluded.checked",
                params![i.id, i.name, i.category_id, i.checked, i.created_at],
            )?;
        }
        StoreOp::DeleteItem(id) => {
            tx.execute("DELETE FROM items WHERE id = ?1", params![id])?;
        }
        StoreOp::DeleteAllItems => {
            tx.execute("DELETE FROM items", [])?;
        }
        StoreOp::ReassignItems { from: Some(from), to } => {
            tx.execute(
                "UPDATE items SET category_id = ?1 WHERE category_id = ?2",
                params![to, from],
            )?;
        }
        StoreOp::ReassignItems { from: None, to } => {
            tx.execute("UPDATE items SET category_id = ?1", params![to])?;
        }
        StoreOp::ResetChecked => {
            tx.execute("UPDATE items SET checked = 0", [])?;
        }
        StoreOp::PutSettings(settings) => {
            let data = serde_json::to_string(&settings)?;
            tx.execute(
                "INSERT INTO settings (id, data) VALUES (1, ?1) ON CONFLICT(id) DO UPDATE SET data = excluded.data",
                params![data],
            )?;
        }
    }
    Ok(())
}

impl Store for SqliteStore {
    fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, icon, color, created_at FROM categories ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                icon: row.get(2)?,
                color: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn items(&self) -> Result<Vec<Item>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, category_id, checked, created_at FROM items ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(Item {
                id: row.get(0)?,
                name: row.get(1)?,
                category_id: row.get(2)?,
                checked: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn settings(&self) -> Result<Settings, StoreError> {
        let data: Option<String> = self
            .conn
            .query_row("SELECT data FROM settings WHERE id = 1", [], |row| row.get(0))
            .optional()?;
        match data {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Settings::default()),
        }
    }

    fn has_settings(&self) -> Result<bool, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;
        Ok(count > 0)
    }

    fn commit(&mut self, ops: Vec<StoreOp>) -> Result<(), StoreError> {
        debug!(op_count = ops.len(), "SqliteStore::commit: called");
        let tx = self.conn.transaction()?;
        for op in ops {
            apply(&tx, op)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn items_in(&self, category_id: &str) -> Result<Vec<Item>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, category_id, checked, created_at FROM items WHERE category_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![category_id], |row| {
            Ok(Item {
                id: row.get(0)?,
                name: row.get(1)?,
                category_id: row.get(2)?,
                checked: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
