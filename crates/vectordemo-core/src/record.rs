//! [`Record`], an untyped instance of a shape, and the [`Model`] trait
//! binding typed structs to their shapes.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Result, error::ValidationError, shape::Shape};

// ─── Record ──────────────────────────────────────────────────────────────────

/// A JSON object keyed by internal (camelCase) field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
  pub fn new() -> Self { Self::default() }

  /// Builder-style insert.
  pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.0.insert(key.into(), value.into());
    self
  }

  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.0.insert(key.into(), value.into())
  }

  pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }

  pub fn remove(&mut self, key: &str) -> Option<Value> { self.0.remove(key) }

  pub fn contains_key(&self, key: &str) -> bool { self.0.contains_key(key) }

  pub fn keys(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn as_map(&self) -> &Map<String, Value> { &self.0 }

  pub fn into_inner(self) -> Map<String, Value> { self.0 }

  /// Serialize a typed model into a record. Fails if the model does not
  /// serialize to a JSON object.
  pub fn from_model<M: Serialize>(model: &M) -> Result<Self> {
    match serde_json::to_value(model)? {
      Value::Object(map) => Ok(Self(map)),
      _ => Err(ValidationError::single("", "Expected object").into()),
    }
  }

  /// Deserialize into a typed model.
  pub fn into_model<M: DeserializeOwned>(self) -> Result<M> {
    Ok(serde_json::from_value(Value::Object(self.0))?)
  }
}

impl From<Map<String, Value>> for Record {
  fn from(map: Map<String, Value>) -> Self { Self(map) }
}

impl From<Record> for Value {
  fn from(record: Record) -> Self { Value::Object(record.0) }
}

// ─── Model ───────────────────────────────────────────────────────────────────

/// A typed struct with a declared shape.
///
/// Implementors serialize with `#[serde(rename_all = "camelCase")]` so that
/// their serde form is the shape's internal naming; the shape then owns the
/// translation to the wire.
pub trait Model: Serialize + DeserializeOwned {
  fn shape() -> Shape;

  /// Validate a wire object against [`Model::shape`] and deserialize it.
  fn from_api(wire: &Value) -> Result<Self> {
    Self::shape().from_api(wire)?.into_model()
  }

  /// Validate and deserialize a wire array of this model.
  fn from_api_many(wire: &Value) -> Result<Vec<Self>> {
    Self::shape()
      .from_api_many(wire)?
      .into_iter()
      .map(Record::into_model)
      .collect()
  }

  /// The full wire form of this value, read-only fields included.
  fn to_api(&self) -> Result<Value> {
    Ok(Self::shape().to_api(&Record::from_model(self)?))
  }

  /// Check this value against its own shape.
  fn validate(&self) -> Result<Record> {
    let record = Record::from_model(self)?;
    Self::shape().validate(&record)?;
    Ok(record)
  }
}

/// Input for operations that take no fields, such as logout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoInput {}

impl Model for NoInput {
  fn shape() -> Shape { Shape::new() }
}
