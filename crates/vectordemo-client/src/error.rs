//! Error type for `vectordemo-client`, and classification of API error
//! bodies.

use std::{collections::BTreeMap, fmt};

use serde_json::Value;
use thiserror::Error;
use vectordemo_core::{ValidationError, case::to_camel_case};

use crate::transport::Method;

/// Shown when a failure has nothing more specific to say.
pub const GENERIC_MESSAGE: &str = "Error...";

#[derive(Debug, Error)]
pub enum Error {
  /// Input or response failed its shape; raised before any request for
  /// inputs.
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Api(#[from] ApiError),

  /// The request could not be completed.
  #[error("transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A success response carried a body that is not JSON.
  #[error("decode error: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("operation has no output shape")]
  NoOutputShape,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<vectordemo_core::Error> for Error {
  fn from(e: vectordemo_core::Error) -> Self {
    match e {
      vectordemo_core::Error::Validation(v) => Self::Validation(v),
      vectordemo_core::Error::Serialization(e) => Self::Decode(e),
    }
  }
}

impl Error {
  pub(crate) fn transport(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Transport(Box::new(e))
  }

  /// 4xx responses and local validation failures: the caller can fix these.
  pub fn is_client_error(&self) -> bool {
    match self {
      Self::Validation(_) => true,
      Self::Api(e) => e.is_client_error(),
      _ => false,
    }
  }

  /// The user-facing breakdown of a client error.
  pub fn report(&self) -> ErrorReport {
    match self {
      Self::Validation(v) => ErrorReport::from(v),
      Self::Api(e) if e.is_client_error() => e.report(),
      _ => ErrorReport::default(),
    }
  }
}

// ─── ApiError ────────────────────────────────────────────────────────────────

/// A non-2xx response.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{method} {path} → {status}")]
pub struct ApiError {
  pub method: Method,
  pub path:   String,
  pub status: u16,
  pub body:   Value,
}

impl ApiError {
  pub fn is_client_error(&self) -> bool { (400..500).contains(&self.status) }

  /// Classify the body. `detail` and `non_field_errors` (or
  /// `non-field-error`) become the summary; every other key is a field
  /// whose messages are collected as-is.
  pub fn report(&self) -> ErrorReport {
    let mut report = ErrorReport::default();
    match &self.body {
      Value::Object(map) => {
        for (key, value) in map {
          match key.as_str() {
            "detail" | "non_field_errors" | "non-field-error" => {
              let joined = messages(value).join(" ");
              if !joined.is_empty() {
                report.summary = Some(joined);
              }
            }
            field => {
              report.field_errors.insert(to_camel_case(field), messages(value));
            }
          }
        }
      }
      Value::String(s) if !s.trim().is_empty() => report.summary = Some(s.clone()),
      _ => {}
    }
    report
  }
}

fn messages(value: &Value) -> Vec<String> {
  match value {
    Value::String(s) => vec![s.clone()],
    Value::Array(items) => items.iter().flat_map(messages).collect(),
    Value::Null => Vec::new(),
    other => vec![other.to_string()],
  }
}

// ─── ErrorReport ─────────────────────────────────────────────────────────────

/// What to tell the user about a failed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
  pub summary:      Option<String>,
  /// Internal field name → messages.
  pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ErrorReport {
  pub fn is_empty(&self) -> bool { self.summary.is_none() && self.field_errors.is_empty() }
}

impl From<&ValidationError> for ErrorReport {
  fn from(v: &ValidationError) -> Self {
    Self { summary: None, field_errors: v.field_errors() }
  }
}

impl fmt::Display for ErrorReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      return f.write_str(GENERIC_MESSAGE);
    }
    let mut lines = Vec::new();
    if let Some(summary) = &self.summary {
      lines.push(summary.clone());
    }
    for (field, messages) in &self.field_errors {
      lines.push(format!("{field}: {}", messages.join(" ")));
    }
    f.write_str(&lines.join("\n"))
  }
}
