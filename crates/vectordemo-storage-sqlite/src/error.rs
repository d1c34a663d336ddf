//! Error type for `vectordemo-storage-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for vectordemo_session::Error {
  fn from(e: Error) -> Self { Self::Storage(Box::new(e)) }
}
