//! SQLite backend for the vectordemo session's durable key-value area.
//!
//! Calls are synchronous and serialized through a single connection; the
//! session store writes at most once per sign-in or sign-out.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStorage;
