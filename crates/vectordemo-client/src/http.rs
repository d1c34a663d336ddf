//! [`HttpClient`]: JSON requests with CSRF and credential headers.

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use vectordemo_session::SessionStore;

use crate::{
  ApiError, Result,
  csrf::{self, CSRF_HEADER},
  transport::{ApiRequest, Method, Transport},
};

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Source of the bearer token, read on every request.
pub trait Credentials: Send + Sync {
  fn auth_token(&self) -> Option<String>;

  /// Called when the server rejects `token` with 401.
  fn invalidate(&self, _token: &str) {}
}

impl Credentials for SessionStore {
  fn auth_token(&self) -> Option<String> { self.token() }

  /// Signs out, unless the session has moved on to a different token.
  fn invalidate(&self, token: &str) {
    if self.token().as_deref() != Some(token) {
      return;
    }
    tracing::warn!("server rejected session token; signing out");
    if let Err(e) = self.logout() {
      tracing::warn!(error = %e, "failed to clear rejected session");
    }
  }
}

/// Never authenticates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Credentials for Anonymous {
  fn auth_token(&self) -> Option<String> { None }
}

const UNAUTHORIZED: u16 = 401;

// ─── Client ──────────────────────────────────────────────────────────────────

pub struct HttpClient<T> {
  transport:   T,
  credentials: Arc<dyn Credentials>,
  csrf_token:  RwLock<Option<String>>,
}

impl<T: Transport> HttpClient<T> {
  pub fn new(transport: T, credentials: Arc<dyn Credentials>) -> Self {
    Self { transport, credentials, csrf_token: RwLock::new(None) }
  }

  /// Seed the CSRF token; later `Set-Cookie` responses replace it.
  pub fn with_csrf_token(self, token: Option<String>) -> Self {
    Self { csrf_token: RwLock::new(token), ..self }
  }

  pub fn csrf_token(&self) -> Option<String> {
    self.csrf_token.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn transport(&self) -> &T { &self.transport }

  pub async fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<Value> {
    self.send(ApiRequest::new(Method::Get, path).with_query(query)).await
  }

  pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
    self.send(ApiRequest::new(Method::Post, path).with_body(body)).await
  }

  pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
    self.send(ApiRequest::new(Method::Put, path).with_body(body)).await
  }

  pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
    self.send(ApiRequest::new(Method::Patch, path).with_body(body)).await
  }

  pub async fn delete(&self, path: &str) -> Result<Value> {
    self.send(ApiRequest::new(Method::Delete, path)).await
  }

  /// Send `request` with the standard headers. Non-2xx responses become
  /// [`ApiError`]; a `csrftoken` cookie in the response is remembered. A 401
  /// to a request that carried a token invalidates the credentials.
  pub async fn send(&self, mut request: ApiRequest) -> Result<Value> {
    let token = self.credentials.auth_token();
    request.headers.extend(self.headers(token.as_deref()));
    let method = request.method;
    let path = request.path.clone();
    tracing::debug!(%method, %path, "api request");

    let response = self.transport.send(request).await?;
    tracing::debug!(%method, %path, status = response.status, "api response");

    let set_cookies = response.set_cookies.iter().map(String::as_str);
    if let Some(csrf) = csrf::token_from_set_cookies(set_cookies) {
      *self.csrf_token.write().unwrap_or_else(PoisonError::into_inner) = Some(csrf);
    }

    if response.status == UNAUTHORIZED
      && let Some(token) = &token
    {
      self.credentials.invalidate(token);
    }

    if !(200..300).contains(&response.status) {
      return Err(ApiError { method, path, status: response.status, body: response.body }.into());
    }
    Ok(response.body)
  }

  fn headers(&self, auth_token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
    if let Some(token) = self.csrf_token() {
      headers.push((CSRF_HEADER.to_owned(), token));
    }
    if let Some(token) = auth_token {
      headers.push(("Authorization".to_owned(), format!("Token {token}")));
    }
    headers
  }
}
