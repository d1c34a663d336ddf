//! Error types for `vectordemo-core`.

use std::{collections::BTreeMap, fmt};

use thiserror::Error;

// ─── Validation ──────────────────────────────────────────────────────────────

/// A single failing field inside a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
  /// Path in internal naming, e.g. `email` or `chunks[0].embedding`.
  /// Empty when the value itself (not one of its fields) is wrong.
  pub path:    String,
  pub message: String,
}

impl FieldIssue {
  pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
    Self { path: path.into(), message: message.into() }
  }
}

/// Data did not match a shape. Raised locally, before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
  pub issues: Vec<FieldIssue>,
}

impl ValidationError {
  pub fn new(issues: Vec<FieldIssue>) -> Self { Self { issues } }

  /// A validation error with exactly one issue.
  pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
    Self { issues: vec![FieldIssue::new(path, message)] }
  }

  /// Paths of every failing field, in the order they were found.
  pub fn fields(&self) -> Vec<&str> {
    self.issues.iter().map(|i| i.path.as_str()).collect()
  }

  /// `true` when any issue is reported for `path`.
  pub fn has_field(&self, path: &str) -> bool {
    self.issues.iter().any(|i| i.path == path)
  }

  /// Issues grouped as field → messages.
  pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for issue in &self.issues {
      map.entry(issue.path.clone()).or_default().push(issue.message.clone());
    }
    map
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "validation failed")?;
    for (i, issue) in self.issues.iter().enumerate() {
      let sep = if i == 0 { ": " } else { "; " };
      if issue.path.is_empty() {
        write!(f, "{sep}{}", issue.message)?;
      } else {
        write!(f, "{sep}{}: {}", issue.path, issue.message)?;
      }
    }
    Ok(())
  }
}

impl std::error::Error for ValidationError {}

// ─── Crate error ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
