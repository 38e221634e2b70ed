//! SQLite persistence for alerts and tasks

use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::StorageError;
use crate::domain::entities::{NewAlert, NewTask, PriceAlert, Task};
use crate::domain::traits::{Resource, ResourceStore};

/// How a resource maps onto its table. `id` and `user_id` columns are implied.
pub trait SqlResource: Resource {
    const TABLE: &'static str;
    /// Column definitions after `id` and `user_id`.
    const COLUMN_DEFS: &'static str;
    /// Columns filled from `Fields` on insert, in `bind` order.
    const COLUMNS: &'static [&'static str];

    fn bind(fields: Self::Fields) -> Vec<Value>;

    /// Build a row from `SELECT id, user_id, <COLUMNS...>`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl SqlResource for PriceAlert {
    const TABLE: &'static str = "alerts";
    const COLUMN_DEFS: &'static str = "coin TEXT, target_price REAL";
    const COLUMNS: &'static [&'static str] = &["coin", "target_price"];

    fn bind(fields: NewAlert) -> Vec<Value> {
        vec![Value::Text(fields.coin), Value::Real(fields.target_price)]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(PriceAlert {
            id: row.get(0)?,
            user_id: row.get(1)?,
            coin: row.get(2)?,
            target_price: row.get(3)?,
        })
    }
}

impl SqlResource for Task {
    const TABLE: &'static str = "tasks";
    const COLUMN_DEFS: &'static str = "task TEXT";
    const COLUMNS: &'static [&'static str] = &["task"];

    fn bind(fields: NewTask) -> Vec<Value> {
        vec![Value::Text(fields.task)]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Task {
            id: row.get(0)?,
            user_id: row.get(1)?,
            task: row.get(2)?,
        })
    }
}

/// One SQLite connection shared by every handler of a bot.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Create the table for `R` if it does not exist yet.
    pub fn ensure_table<R: SqlResource>(&self) -> Result<(), StorageError> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER,
                    {}
                )",
                R::TABLE,
                R::COLUMN_DEFS
            ),
            [],
        )?;

        conn.execute(
            &format!(
                "CREATE INDEX IF NOT EXISTS idx_{0}_user ON {0}(user_id)",
                R::TABLE
            ),
            [],
        )?;

        tracing::debug!("Table {} ready", R::TABLE);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

fn select_columns<R: SqlResource>() -> String {
    let mut cols = vec!["id", "user_id"];
    cols.extend_from_slice(R::COLUMNS);
    cols.join(", ")
}

impl<R: SqlResource> ResourceStore<R> for Database {
    fn create(&self, user_id: i64, fields: R::Fields) -> Result<i64, StorageError> {
        let placeholders: Vec<String> = (2..=R::COLUMNS.len() + 1).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} (user_id, {}) VALUES (?1, {})",
            R::TABLE,
            R::COLUMNS.join(", "),
            placeholders.join(", ")
        );

        let values = std::iter::once(Value::Integer(user_id)).chain(R::bind(fields));

        let conn = self.lock()?;
        conn.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(conn.last_insert_rowid())
    }

    fn list(&self, user_id: i64) -> Result<Vec<R>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE user_id = ?1 ORDER BY id",
            select_columns::<R>(),
            R::TABLE
        ))?;

        let rows = stmt.query_map([user_id], |row| R::from_row(row))?;

        let mut items = Vec::new();
        for item in rows {
            items.push(item?);
        }
        Ok(items)
    }

    fn delete(&self, id: i64, user_id: i64) -> Result<bool, StorageError> {
        let conn = self.lock()?;
        let rows = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", R::TABLE),
            [id, user_id],
        )?;
        Ok(rows > 0)
    }
}
