//! [`Shape`]: a declarative resource schema.
//!
//! A shape is an ordered list of `(internal name, Field)` pairs. It validates
//! records and translates them to and from the wire, where every field name
//! is the snake_case form of its internal camelCase name. Translation is
//! driven by the shape: only declared fields cross the boundary, and wire
//! keys the shape does not know are dropped.

use serde_json::{Map, Value};

use crate::{
  case::to_snake_case,
  error::{FieldIssue, ValidationError},
  field::Field,
  record::Record,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
  fields: Vec<(String, Field)>,
}

impl Shape {
  pub fn new() -> Self { Self::default() }

  /// The common base every resource extends: `id`, `datetimeCreated` and
  /// `lastEdited`, all server-assigned.
  pub fn base() -> Self {
    Self::new()
      .field("id", Field::uuid().read_only())
      .field("datetimeCreated", Field::datetime().optional().read_only())
      .field("lastEdited", Field::datetime().optional().read_only())
  }

  // ── Composition ─────────────────────────────────────────────────────────

  /// Add a field, replacing any existing field with the same name in place.
  pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
    let name = name.into();
    match self.fields.iter_mut().find(|(n, _)| *n == name) {
      Some(slot) => slot.1 = field,
      None => self.fields.push((name, field)),
    }
    self
  }

  /// Extend with every field of `other`; `other` wins on name clashes.
  pub fn extend(self, other: &Shape) -> Self {
    other
      .fields
      .iter()
      .fold(self, |shape, (name, field)| shape.field(name.clone(), field.clone()))
  }

  /// A shape holding only the named fields, in this shape's order.
  pub fn pick(&self, names: &[&str]) -> Self {
    Self {
      fields: self
        .fields
        .iter()
        .filter(|(n, _)| names.contains(&n.as_str()))
        .cloned()
        .collect(),
    }
  }

  /// The fields a client may send: every non-read-only field.
  pub fn create_subset(&self) -> Self {
    Self {
      fields: self
        .fields
        .iter()
        .filter(|(_, f)| !f.read_only)
        .cloned()
        .collect(),
    }
  }

  /// The same shape with every field made optional, for partial updates.
  pub fn partial(&self) -> Self {
    Self {
      fields: self
        .fields
        .iter()
        .map(|(n, f)| (n.clone(), f.clone().optional()))
        .collect(),
    }
  }

  // ── Accessors ───────────────────────────────────────────────────────────

  pub fn get(&self, name: &str) -> Option<&Field> {
    self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
  }

  pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
    self.fields.iter().map(|(n, f)| (n.as_str(), f))
  }

  pub fn len(&self) -> usize { self.fields.len() }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  // ── Validation ──────────────────────────────────────────────────────────

  /// Validate a record in internal naming. Every failing field is reported.
  pub fn validate(&self, record: &Record) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    self.check_map(record.as_map(), "", &mut issues);
    if issues.is_empty() {
      Ok(())
    } else {
      Err(ValidationError::new(issues))
    }
  }

  pub(crate) fn check_map(
    &self,
    map: &Map<String, Value>,
    prefix: &str,
    issues: &mut Vec<FieldIssue>,
  ) {
    for (name, field) in &self.fields {
      field.check(&join_path(prefix, name), map.get(name), issues);
    }
  }

  // ── Wire translation ────────────────────────────────────────────────────

  /// Serialize every declared field present in `record`, read-only included.
  pub fn to_api(&self, record: &Record) -> Value {
    Value::Object(self.map_to_wire(record.as_map(), true))
  }

  /// Serialize the fields a client may send: read-only fields are dropped at
  /// every nesting level.
  pub fn to_api_input(&self, record: &Record) -> Value {
    Value::Object(self.map_to_wire(record.as_map(), false))
  }

  /// Translate a wire object to internal naming and validate it.
  pub fn from_api(&self, wire: &Value) -> Result<Record, ValidationError> {
    let Some(map) = wire.as_object() else {
      return Err(ValidationError::single("", "Expected object"));
    };
    let record = Record::from(self.map_from_wire(map));
    self.validate(&record)?;
    Ok(record)
  }

  /// Translate and validate a wire array whose items all match this shape.
  /// Issue paths are prefixed with the item index, e.g. `[2].title`.
  pub fn from_api_many(&self, wire: &Value) -> Result<Vec<Record>, ValidationError> {
    let Some(items) = wire.as_array() else {
      return Err(ValidationError::single("", "Expected array"));
    };
    let mut records = Vec::with_capacity(items.len());
    let mut issues = Vec::new();
    for (i, item) in items.iter().enumerate() {
      match self.from_api(item) {
        Ok(record) => records.push(record),
        Err(err) => issues.extend(err.issues.into_iter().map(|issue| {
          FieldIssue::new(join_path(&format!("[{i}]"), &issue.path), issue.message)
        })),
      }
    }
    if issues.is_empty() {
      Ok(records)
    } else {
      Err(ValidationError::new(issues))
    }
  }

  pub(crate) fn map_to_wire(
    &self,
    map: &Map<String, Value>,
    include_read_only: bool,
  ) -> Map<String, Value> {
    let mut out = Map::new();
    for (name, field) in &self.fields {
      if field.read_only && !include_read_only {
        continue;
      }
      if let Some(value) = map.get(name) {
        out.insert(to_snake_case(name), field.to_wire(value, include_read_only));
      }
    }
    out
  }

  pub(crate) fn map_from_wire(&self, wire: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (name, field) in &self.fields {
      if let Some(value) = wire.get(&to_snake_case(name)) {
        out.insert(name.clone(), field.from_wire(value));
      }
    }
    out
  }
}

fn join_path(prefix: &str, name: &str) -> String {
  match (prefix.is_empty(), name.is_empty()) {
    (true, _) => name.to_owned(),
    (false, true) => prefix.to_owned(),
    (false, false) => format!("{prefix}.{name}"),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn chunk_shape() -> Shape {
    Shape::new()
      .field("jobDescriptionId", Field::uuid())
      .field("tokenCount", Field::integer().nullable())
      .field("embedding", Field::array(Field::number()))
  }

  fn result_shape() -> Shape {
    Shape::new()
      .field("score", Field::number().read_only())
      .field(
        "jobDescription",
        Field::object(Shape::base().field("title", Field::string())),
      )
      .field("chunks", Field::array(Field::object(chunk_shape())))
  }

  fn wire_result() -> Value {
    json!({
      "score": 0.42,
      "job_description": {
        "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "datetime_created": "2024-03-01T12:00:00Z",
        "title": "Choir Director"
      },
      "chunks": [{
        "job_description_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "token_count": 128,
        "embedding": [0.1, 0.2],
        "unexpected": true
      }]
    })
  }

  #[test]
  fn base_fields_are_read_only() {
    let base = Shape::base();
    assert_eq!(base.len(), 3);
    assert!(base.fields().all(|(_, f)| f.read_only));
    assert!(base.create_subset().is_empty());
  }

  #[test]
  fn field_replaces_in_place() {
    let shape = Shape::new()
      .field("a", Field::string())
      .field("b", Field::string())
      .field("a", Field::number());
    let names: Vec<_> = shape.fields().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(shape.get("a"), Some(&Field::number()));
  }

  #[test]
  fn from_api_translates_nested_names_and_strips_unknown_keys() {
    let record = result_shape().from_api(&wire_result()).unwrap();
    let jd = record.get("jobDescription").unwrap();
    assert_eq!(jd["title"], "Choir Director");
    assert_eq!(jd["datetimeCreated"], "2024-03-01T12:00:00Z");
    let chunk = &record.get("chunks").unwrap()[0];
    assert_eq!(chunk["tokenCount"], 128);
    assert!(chunk.get("unexpected").is_none());
  }

  #[test]
  fn round_trip_through_wire_is_identity() {
    let shape = result_shape();
    let record = shape.from_api(&wire_result()).unwrap();
    let again = shape.from_api(&shape.to_api(&record)).unwrap();
    assert_eq!(again, record);
  }

  #[test]
  fn to_api_input_excludes_read_only_at_every_level() {
    let shape = result_shape();
    let record = shape.from_api(&wire_result()).unwrap();
    let wire = shape.to_api_input(&record);
    assert!(wire.get("score").is_none());
    assert!(wire["job_description"].get("id").is_none());
    assert!(wire["job_description"].get("datetime_created").is_none());
    assert_eq!(wire["job_description"]["title"], "Choir Director");
  }

  #[test]
  fn nested_failures_name_the_full_path() {
    let mut wire = wire_result();
    wire["chunks"][0]["embedding"] = json!([0.1, "x"]);
    wire["job_description"]["title"] = json!(null);
    let err = result_shape().from_api(&wire).unwrap_err();
    assert!(err.has_field("jobDescription.title"));
    assert!(err.has_field("chunks[0].embedding[1]"));
  }

  #[test]
  fn from_api_rejects_non_objects() {
    let err = Shape::base().from_api(&json!([1, 2])).unwrap_err();
    assert_eq!(err.fields(), vec![""]);
  }

  #[test]
  fn from_api_many_prefixes_item_index() {
    let shape = Shape::new().field("title", Field::string());
    let err = shape
      .from_api_many(&json!([{ "title": "ok" }, { "title": 5 }]))
      .unwrap_err();
    assert_eq!(err.fields(), vec!["[1].title"]);
  }

  #[test]
  fn partial_accepts_any_subset() {
    let shape = Shape::new()
      .field("title", Field::string())
      .field("company", Field::string())
      .partial();
    let record = Record::new().with("title", "Cantor");
    assert!(shape.validate(&record).is_ok());
    assert_eq!(shape.to_api_input(&record), json!({ "title": "Cantor" }));
  }
}
