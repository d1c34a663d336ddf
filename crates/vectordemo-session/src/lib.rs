//! Session state for the vectordemo client.
//!
//! [`SessionStore`] holds the signed-in user (if any), persists it through a
//! [`KeyValueStore`] after every change, and rehydrates it at startup. The
//! [`guard`] module decides navigation from the store's `is_logged_in`
//! selector.
//!
//! The store never talks to the API; callers write the user back after a
//! successful login or signup.

pub mod error;
pub mod guard;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
pub use storage::{KeyValueStore, MemoryStorage};
pub use store::{SessionState, SessionStore, StorageKey};
