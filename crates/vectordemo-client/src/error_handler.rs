//! [`ErrorHandler`] decides whether a failed call is shown, re-raised or
//! swallowed.

use crate::{Error, error::GENERIC_MESSAGE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorHandlerOptions {
  /// Prefix for log lines, e.g. `"users"`.
  pub api_name:         String,
  /// Return the message for client errors (4xx and local validation).
  pub enable_400_alert: bool,
  /// Return the generic message for every other failure.
  pub enable_500_alert: bool,
  /// Re-raise errors that are not alerted.
  pub rethrow_errors:   bool,
}

impl Default for ErrorHandlerOptions {
  fn default() -> Self {
    Self {
      api_name:         String::new(),
      enable_400_alert: false,
      enable_500_alert: false,
      rethrow_errors:   true,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct ErrorHandler {
  options: ErrorHandlerOptions,
}

impl ErrorHandler {
  pub fn new(options: ErrorHandlerOptions) -> Self { Self { options } }

  pub fn options(&self) -> &ErrorHandlerOptions { &self.options }

  /// `Ok(Some(message))` when the error should be shown to the user,
  /// `Err(err)` when it is re-raised, `Ok(None)` when it is only logged.
  pub fn handle(&self, err: Error) -> Result<Option<String>, Error> {
    let api = self.options.api_name.as_str();
    tracing::error!(api, error = %err, "api call failed");

    let alert = if err.is_client_error() {
      self.options.enable_400_alert.then(|| err.report().to_string())
    } else {
      self.options.enable_500_alert.then(|| GENERIC_MESSAGE.to_owned())
    };

    match alert {
      Some(message) => Ok(Some(message)),
      None if self.options.rethrow_errors => Err(err),
      None => {
        tracing::warn!(api, error = %err, "suppressed api error");
        Ok(None)
      }
    }
  }
}
