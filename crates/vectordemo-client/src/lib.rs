//! HTTP dispatch for the vectordemo API.
//!
//! [`HttpClient`] sends JSON requests through a [`Transport`], attaching the
//! CSRF token and the session's credentials at dispatch time.
//! [`ResourceApi`] layers schema validation and naming translation over it:
//! inputs are validated before any request is made, and every response is
//! validated against the resource's shape before it is returned.

pub mod config;
pub mod csrf;
pub mod error;
pub mod error_handler;
pub mod http;
pub mod job_descriptions;
pub mod resource;
pub mod transport;
pub mod users;

pub use config::ClientConfig;
pub use error::{ApiError, Error, ErrorReport, Result};
pub use error_handler::{ErrorHandler, ErrorHandlerOptions};
pub use http::{Anonymous, Credentials, HttpClient};
pub use job_descriptions::{JobDescriptionApi, job_description_api};
pub use resource::{CallUtils, CustomCall, ResourceApi};
pub use transport::{ApiRequest, ApiResponse, Method, ReqwestTransport, Transport};
pub use users::{UserApi, user_api};

#[cfg(test)]
mod tests;
