//! The durable key-value area the session is persisted into.
//!
//! Implemented by storage backends (e.g. `vectordemo-storage-sqlite`).
//! Calls are synchronous: a session write completes before `set_user`
//! returns.

use std::{
  collections::HashMap,
  sync::{Mutex, PoisonError},
};

use crate::Result;

pub trait KeyValueStore: Send + Sync {
  fn get_item(&self, key: &str) -> Result<Option<String>>;

  fn set_item(&self, key: &str, value: &str) -> Result<()>;

  fn remove_item(&self, key: &str) -> Result<()>;
}

/// Process-local storage; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
  pub fn new() -> Self { Self::default() }
}

impl KeyValueStore for MemoryStorage {
  fn get_item(&self, key: &str) -> Result<Option<String>> {
    let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(items.get(key).cloned())
  }

  fn set_item(&self, key: &str, value: &str) -> Result<()> {
    let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
    items.insert(key.to_owned(), value.to_owned());
    Ok(())
  }

  fn remove_item(&self, key: &str) -> Result<()> {
    let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
    items.remove(key);
    Ok(())
  }
}
