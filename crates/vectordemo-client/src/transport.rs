//! The [`Transport`] seam between [`HttpClient`](crate::HttpClient) and the
//! network.

use std::future::Future;

use serde_json::Value;
use strum::Display;

use crate::{Error, Result, config::ClientConfig};

// ─── Request / response ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
  Get,
  Post,
  Put,
  Patch,
  Delete,
}

impl From<Method> for reqwest::Method {
  fn from(m: Method) -> Self {
    match m {
      Method::Get => Self::GET,
      Method::Post => Self::POST,
      Method::Put => Self::PUT,
      Method::Patch => Self::PATCH,
      Method::Delete => Self::DELETE,
    }
  }
}

/// A request relative to the API root, e.g. `GET /users/<id>/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub method:  Method,
  pub path:    String,
  pub query:   Vec<(String, String)>,
  pub headers: Vec<(String, String)>,
  pub body:    Option<Value>,
}

impl ApiRequest {
  pub fn new(method: Method, path: impl Into<String>) -> Self {
    Self {
      method,
      path: path.into(),
      query: Vec::new(),
      headers: Vec::new(),
      body: None,
    }
  }

  pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
    self.query = query;
    self
  }

  pub fn with_body(mut self, body: Value) -> Self {
    self.body = Some(body);
    self
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(n, _)| n.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
  pub status:      u16,
  /// Parsed JSON; a non-JSON error body is kept as a string, an empty body
  /// is `null`.
  pub body:        Value,
  /// Raw `Set-Cookie` header values.
  pub set_cookies: Vec<String>,
}

impl ApiResponse {
  pub fn json(status: u16, body: Value) -> Self { Self { status, body, set_cookies: Vec::new() } }
}

// ─── Transport ───────────────────────────────────────────────────────────────

pub trait Transport: Send + Sync {
  fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send + '_;
}

/// [`Transport`] over [`reqwest`].
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
  client:   reqwest::Client,
  api_root: String,
}

impl ReqwestTransport {
  pub fn new(config: &ClientConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(Error::transport)?;
    Ok(Self { client, api_root: config.api_root() })
  }

  fn url(&self, path: &str) -> String { format!("{}{}", self.api_root, path) }
}

impl Transport for ReqwestTransport {
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
    let mut req = self.client.request(request.method.into(), self.url(&request.path));
    if !request.query.is_empty() {
      req = req.query(&request.query);
    }
    for (name, value) in &request.headers {
      req = req.header(name.as_str(), value.as_str());
    }
    if let Some(body) = &request.body {
      req = req.json(body);
    }

    let resp = req.send().await.map_err(Error::transport)?;
    let status = resp.status();
    let set_cookies = resp
      .headers()
      .get_all(reqwest::header::SET_COOKIE)
      .iter()
      .filter_map(|v| v.to_str().ok())
      .map(str::to_owned)
      .collect();
    let text = resp.text().await.map_err(Error::transport)?;

    let body = if text.trim().is_empty() {
      Value::Null
    } else if status.is_success() {
      serde_json::from_str(&text)?
    } else {
      serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text))
    };
    Ok(ApiResponse { status: status.as_u16(), body, set_cookies })
  }
}
