//! [`SessionStore`]: the single authoritative record of who is signed in.

use std::{
  fmt,
  sync::{Arc, PoisonError, RwLock},
};

use serde::{Deserialize, Serialize};
use vectordemo_core::models::User;

use crate::{Result, storage::KeyValueStore};

// ─── Storage key ─────────────────────────────────────────────────────────────

pub const APP_NAMESPACE: &str = "vector_demonstration";
pub const STORAGE_HASH: &str = "WGkzbemqza";

/// Namespaced key the session is persisted under: `<namespace>-<hash>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
  pub fn new(namespace: &str, hash: &str) -> Self { Self(format!("{namespace}-{hash}")) }

  /// The application's fixed key.
  pub fn app() -> Self { Self::new(APP_NAMESPACE, STORAGE_HASH) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for StorageKey {
  fn default() -> Self { Self::app() }
}

impl fmt::Display for StorageKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── State ───────────────────────────────────────────────────────────────────

/// The persisted state tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
  pub user: Option<User>,
}

impl SessionState {
  /// `true` iff a user is present and holds a token.
  pub fn is_logged_in(&self) -> bool { self.token().is_some() }

  pub fn token(&self) -> Option<&str> { self.user.as_ref()?.token.as_deref() }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Session state plus its persistence.
///
/// [`SessionStore::set_user`] is the only way to change the user. The new
/// state is written to storage before it becomes visible, so a failed write
/// leaves both copies on the old state.
pub struct SessionStore {
  state:   RwLock<SessionState>,
  storage: Arc<dyn KeyValueStore>,
  key:     StorageKey,
}

impl SessionStore {
  /// Rehydrate from `storage`, or start signed out when nothing is stored.
  /// An unreadable entry is logged and treated as signed out.
  pub fn load(storage: Arc<dyn KeyValueStore>, key: StorageKey) -> Result<Self> {
    let state = match storage.get_item(key.as_str())? {
      None => SessionState::default(),
      Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key = %key, error = %e, "discarding unreadable session entry");
        SessionState::default()
      }),
    };
    tracing::debug!(key = %key, logged_in = state.is_logged_in(), "session loaded");
    Ok(Self { state: RwLock::new(state), storage, key })
  }

  /// Replace the current user (`None` signs out) and persist.
  pub fn set_user(&self, user: Option<User>) -> Result<()> {
    let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
    let next = SessionState { user };
    self.save(&next)?;
    *state = next;
    Ok(())
  }

  pub fn logout(&self) -> Result<()> { self.set_user(None) }

  /// Counterpart of [`SessionStore::load`]; runs inside every `set_user`.
  fn save(&self, state: &SessionState) -> Result<()> {
    let raw = serde_json::to_string(state)?;
    self.storage.set_item(self.key.as_str(), &raw)
  }

  // ── Selectors ─────────────────────────────────────────────────────────

  pub fn is_logged_in(&self) -> bool { self.read(SessionState::is_logged_in) }

  pub fn current_user(&self) -> Option<User> { self.read(|s| s.user.clone()) }

  pub fn token(&self) -> Option<String> { self.read(|s| s.token().map(str::to_owned)) }

  pub fn snapshot(&self) -> SessionState { self.read(SessionState::clone) }

  pub fn key(&self) -> &StorageKey { &self.key }

  fn read<T>(&self, f: impl FnOnce(&SessionState) -> T) -> T {
    let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
    f(&*state)
  }
}

impl fmt::Debug for SessionStore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SessionStore")
      .field("key", &self.key)
      .field("logged_in", &self.is_logged_in())
      .finish_non_exhaustive()
  }
}
