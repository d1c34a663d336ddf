//! [`ResourceApi`]: generic CRUD and custom-call dispatch over a shape.

use std::{future::Future, marker::PhantomData, sync::Arc};

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;
use vectordemo_core::{
  Model, Record, Shape,
  filter::{FilterMap, FilterValues, build_params},
  models::{Page, Pagination},
};

use crate::{Error, HttpClient, Result, transport::Transport};

// ─── Custom calls ────────────────────────────────────────────────────────────

/// Serialization helpers handed to a [`CustomCall`], driven by the call's
/// input and output shapes.
#[derive(Debug, Clone)]
pub struct CallUtils {
  input:  Shape,
  output: Option<Shape>,
}

impl CallUtils {
  pub fn new(input: Shape, output: Option<Shape>) -> Self { Self { input, output } }

  /// Wire form of a validated input; read-only fields are dropped.
  pub fn to_api(&self, input: &Record) -> Value { self.input.to_api_input(input) }

  /// Validate a response against the output shape and deserialize it.
  pub fn from_api<R: DeserializeOwned>(&self, wire: &Value) -> Result<R> {
    let shape = self.output.as_ref().ok_or(Error::NoOutputShape)?;
    Ok(shape.from_api(wire)?.into_model()?)
  }

  /// As [`CallUtils::from_api`], for a response array.
  pub fn from_api_many<R: DeserializeOwned>(&self, wire: &Value) -> Result<Vec<R>> {
    let shape = self.output.as_ref().ok_or(Error::NoOutputShape)?;
    let mut out = Vec::new();
    for record in shape.from_api_many(wire)? {
      out.push(record.into_model()?);
    }
    Ok(out)
  }
}

/// A resource operation outside CRUD.
///
/// The input is validated against `Self::Input`'s shape before
/// [`CustomCall::handle`] runs, so handlers never see invalid input.
pub trait CustomCall: Send + Sync {
  type Input: Model + Send;
  type Output: Send;

  /// Shape used by [`CallUtils::from_api`]. `None` for calls with no body
  /// in the response.
  fn output_shape(&self) -> Option<Shape> { None }

  fn handle<T: Transport>(
    &self,
    client: &HttpClient<T>,
    input: Record,
    utils: &CallUtils,
  ) -> impl Future<Output = Result<Self::Output>> + Send;
}

// ─── Resource ────────────────────────────────────────────────────────────────

/// CRUD for entity `M`, created from `C` (defaults to `M`), rooted at
/// `base_uri` (e.g. `/job-descriptions/`).
pub struct ResourceApi<T, M, C = M> {
  client:   Arc<HttpClient<T>>,
  base_uri: String,
  filters:  FilterMap,
  _marker:  PhantomData<fn() -> (M, C)>,
}

impl<T: Transport, M: Model, C: Model> ResourceApi<T, M, C> {
  pub fn new(client: Arc<HttpClient<T>>, base_uri: impl Into<String>) -> Self {
    Self {
      client,
      base_uri: base_uri.into(),
      filters: FilterMap::new(),
      _marker: PhantomData,
    }
  }

  pub fn with_filters(mut self, filters: FilterMap) -> Self {
    self.filters = filters;
    self
  }

  pub fn base_uri(&self) -> &str { &self.base_uri }

  pub fn filters(&self) -> &FilterMap { &self.filters }

  pub fn client(&self) -> &HttpClient<T> { &self.client }

  fn detail_uri(&self, id: Uuid) -> String { format!("{}{id}/", self.base_uri) }

  // ── CRUD ──────────────────────────────────────────────────────────────

  /// `POST {base}`
  pub async fn create(&self, input: &C) -> Result<M> {
    self.create_record(Record::from_model(input)?).await
  }

  /// `POST {base}` with an untyped record in internal naming.
  pub async fn create_record(&self, input: Record) -> Result<M> {
    let shape = C::shape().create_subset();
    shape.validate(&input)?;
    let wire = self.client.post(&self.base_uri, shape.to_api_input(&input)).await?;
    Ok(M::from_api(&wire)?)
  }

  /// `GET {base}{id}/`
  pub async fn retrieve(&self, id: Uuid) -> Result<M> {
    let wire = self.client.get(&self.detail_uri(id), Vec::new()).await?;
    Ok(M::from_api(&wire)?)
  }

  /// `GET {base}?<filters>&page=<n>&page_size=<n>`
  pub async fn list(&self, filters: &FilterValues, pagination: Pagination) -> Result<Page<M>> {
    let mut query = build_params(&self.filters, filters);
    query.extend(pagination.to_params());
    let wire = self.client.get(&self.base_uri, query).await?;
    Ok(Page::<M>::from_api(&wire)?)
  }

  /// `PATCH {base}{id}/` with only the fields present in `partial`.
  pub async fn update(&self, id: Uuid, partial: Record) -> Result<M> {
    let shape = C::shape().create_subset().partial();
    shape.validate(&partial)?;
    let wire = self
      .client
      .patch(&self.detail_uri(id), shape.to_api_input(&partial))
      .await?;
    Ok(M::from_api(&wire)?)
  }

  /// `PUT {base}{id}/`; required fields are enforced as for create.
  pub async fn replace(&self, id: Uuid, input: &C) -> Result<M> {
    self.replace_record(id, Record::from_model(input)?).await
  }

  pub async fn replace_record(&self, id: Uuid, input: Record) -> Result<M> {
    let shape = C::shape().create_subset();
    shape.validate(&input)?;
    let wire = self
      .client
      .put(&self.detail_uri(id), shape.to_api_input(&input))
      .await?;
    Ok(M::from_api(&wire)?)
  }

  /// `DELETE {base}{id}/`
  pub async fn remove(&self, id: Uuid) -> Result<()> {
    self.client.delete(&self.detail_uri(id)).await?;
    Ok(())
  }

  // ── Custom calls ──────────────────────────────────────────────────────

  /// Validate `input` against the call's input shape, then run it.
  pub async fn call<O: CustomCall>(&self, op: &O, input: O::Input) -> Result<O::Output> {
    let record = input.validate()?;
    let utils = CallUtils::new(<O::Input as Model>::shape(), op.output_shape());
    op.handle(&self.client, record, &utils).await
  }
}
