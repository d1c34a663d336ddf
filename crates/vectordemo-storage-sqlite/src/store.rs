//! [`SqliteStorage`], the SQLite implementation of [`KeyValueStore`].

use std::{
  path::Path,
  sync::{Mutex, PoisonError},
};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use vectordemo_session::KeyValueStore;

use crate::{Result, schema::SCHEMA};

// ─── Storage ─────────────────────────────────────────────────────────────────

/// A key-value area backed by a single SQLite file.
pub struct SqliteStorage {
  conn: Mutex<rusqlite::Connection>,
}

impl SqliteStorage {
  /// Open (or create) the database at `path`, creating parent directories
  /// as needed.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    tracing::debug!(path = %path.display(), "opening session storage");
    Self::init(rusqlite::Connection::open(path)?)
  }

  /// Open an in-memory database, for tests.
  pub fn open_in_memory() -> Result<Self> {
    Self::init(rusqlite::Connection::open_in_memory()?)
  }

  fn init(conn: rusqlite::Connection) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self { conn: Mutex::new(conn) })
  }

  fn with_conn<T>(&self, f: impl FnOnce(&rusqlite::Connection) -> Result<T>) -> Result<T> {
    let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
    f(&conn)
  }

  pub fn get(&self, key: &str) -> Result<Option<String>> {
    self.with_conn(|conn| {
      let value = conn
        .query_row(
          "SELECT value FROM kv_store WHERE key = ?1",
          rusqlite::params![key],
          |row| row.get(0),
        )
        .optional()?;
      Ok(value)
    })
  }

  pub fn set(&self, key: &str, value: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    self.with_conn(|conn| {
      conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                        updated_at = excluded.updated_at",
        rusqlite::params![key, value, now],
      )?;
      Ok(())
    })
  }

  pub fn remove(&self, key: &str) -> Result<()> {
    self.with_conn(|conn| {
      conn.execute("DELETE FROM kv_store WHERE key = ?1", rusqlite::params![key])?;
      Ok(())
    })
  }
}

// ─── KeyValueStore impl ──────────────────────────────────────────────────────

impl KeyValueStore for SqliteStorage {
  fn get_item(&self, key: &str) -> vectordemo_session::Result<Option<String>> {
    Ok(self.get(key)?)
  }

  fn set_item(&self, key: &str, value: &str) -> vectordemo_session::Result<()> {
    Ok(self.set(key, value)?)
  }

  fn remove_item(&self, key: &str) -> vectordemo_session::Result<()> {
    Ok(self.remove(key)?)
  }
}
