//! Field descriptors, the semantic type of one entry in a [`Shape`].

use chrono::DateTime;
use serde_json::Value;
use uuid::Uuid;

use crate::{error::FieldIssue, shape::Shape};

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The semantic type a field's value must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
  String,
  /// A string containing a plausible email address.
  Email,
  /// A string parseable as a UUID.
  Uuid,
  /// An RFC 3339 timestamp string.
  DateTime,
  Number,
  Integer,
  Boolean,
  /// A homogeneous array whose items satisfy the inner field.
  Array(Box<Field>),
  /// A nested object described by its own shape.
  Object(Shape),
}

impl FieldKind {
  fn expected(&self) -> &'static str {
    match self {
      Self::String | Self::Email | Self::Uuid | Self::DateTime => "string",
      Self::Number => "number",
      Self::Integer => "integer",
      Self::Boolean => "boolean",
      Self::Array(_) => "array",
      Self::Object(_) => "object",
    }
  }
}

// ─── Field ───────────────────────────────────────────────────────────────────

/// A kind plus the optional / nullable / read-only markers.
///
/// Fields are built with chained constructors:
///
/// ```
/// use vectordemo_core::Field;
/// let token = Field::string().nullable().optional().read_only();
/// assert!(token.read_only);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
  pub kind:      FieldKind,
  /// The key may be absent.
  pub optional:  bool,
  /// The value may be `null`.
  pub nullable:  bool,
  /// Accepted on read, never sent on create/update.
  pub read_only: bool,
}

impl Field {
  pub fn new(kind: FieldKind) -> Self {
    Self { kind, optional: false, nullable: false, read_only: false }
  }

  pub fn string() -> Self { Self::new(FieldKind::String) }
  pub fn email() -> Self { Self::new(FieldKind::Email) }
  pub fn uuid() -> Self { Self::new(FieldKind::Uuid) }
  pub fn datetime() -> Self { Self::new(FieldKind::DateTime) }
  pub fn number() -> Self { Self::new(FieldKind::Number) }
  pub fn integer() -> Self { Self::new(FieldKind::Integer) }
  pub fn boolean() -> Self { Self::new(FieldKind::Boolean) }

  pub fn array(item: Field) -> Self {
    Self::new(FieldKind::Array(Box::new(item)))
  }

  pub fn object(shape: Shape) -> Self { Self::new(FieldKind::Object(shape)) }

  pub fn optional(mut self) -> Self {
    self.optional = true;
    self
  }

  pub fn nullable(mut self) -> Self {
    self.nullable = true;
    self
  }

  pub fn read_only(mut self) -> Self {
    self.read_only = true;
    self
  }

  // ── Validation ──────────────────────────────────────────────────────────

  /// Check `value` (`None` = key absent) and push any failures onto `issues`.
  pub(crate) fn check(
    &self,
    path: &str,
    value: Option<&Value>,
    issues: &mut Vec<FieldIssue>,
  ) {
    let value = match value {
      None if self.optional => return,
      None => {
        issues.push(FieldIssue::new(path, "Required"));
        return;
      }
      Some(Value::Null) if self.nullable => return,
      Some(Value::Null) => {
        issues.push(FieldIssue::new(
          path,
          format!("Expected {}, received null", self.kind.expected()),
        ));
        return;
      }
      Some(v) => v,
    };

    match &self.kind {
      FieldKind::String => expect(value.is_string(), path, "Expected string", issues),
      FieldKind::Email => match value.as_str() {
        Some(s) => expect(looks_like_email(s), path, "Invalid email", issues),
        None => issues.push(FieldIssue::new(path, "Expected string")),
      },
      FieldKind::Uuid => match value.as_str() {
        Some(s) => expect(Uuid::parse_str(s).is_ok(), path, "Invalid uuid", issues),
        None => issues.push(FieldIssue::new(path, "Expected string")),
      },
      FieldKind::DateTime => match value.as_str() {
        Some(s) => expect(
          DateTime::parse_from_rfc3339(s).is_ok(),
          path,
          "Invalid datetime",
          issues,
        ),
        None => issues.push(FieldIssue::new(path, "Expected string")),
      },
      FieldKind::Number => expect(value.is_number(), path, "Expected number", issues),
      FieldKind::Integer => expect(
        value.is_i64() || value.is_u64(),
        path,
        "Expected integer",
        issues,
      ),
      FieldKind::Boolean => expect(value.is_boolean(), path, "Expected boolean", issues),
      FieldKind::Array(item) => match value.as_array() {
        Some(items) => {
          for (i, v) in items.iter().enumerate() {
            item.check(&format!("{path}[{i}]"), Some(v), issues);
          }
        }
        None => issues.push(FieldIssue::new(path, "Expected array")),
      },
      FieldKind::Object(shape) => match value.as_object() {
        Some(map) => shape.check_map(map, path, issues),
        None => issues.push(FieldIssue::new(path, "Expected object")),
      },
    }
  }

  // ── Naming translation ──────────────────────────────────────────────────

  /// Rename nested object keys from internal to wire naming.
  pub(crate) fn to_wire(&self, value: &Value, include_read_only: bool) -> Value {
    match (&self.kind, value) {
      (FieldKind::Object(shape), Value::Object(map)) => {
        Value::Object(shape.map_to_wire(map, include_read_only))
      }
      (FieldKind::Array(item), Value::Array(items)) => Value::Array(
        items
          .iter()
          .map(|v| item.to_wire(v, include_read_only))
          .collect(),
      ),
      _ => value.clone(),
    }
  }

  /// Rename nested object keys from wire to internal naming.
  pub(crate) fn from_wire(&self, value: &Value) -> Value {
    match (&self.kind, value) {
      (FieldKind::Object(shape), Value::Object(map)) => {
        Value::Object(shape.map_from_wire(map))
      }
      (FieldKind::Array(item), Value::Array(items)) => {
        Value::Array(items.iter().map(|v| item.from_wire(v)).collect())
      }
      _ => value.clone(),
    }
  }
}

fn expect(ok: bool, path: &str, message: &str, issues: &mut Vec<FieldIssue>) {
  if !ok {
    issues.push(FieldIssue::new(path, message));
  }
}

/// Minimal structural email check: one `@`, a non-empty local part, a dotted
/// domain, and no whitespace.
pub fn looks_like_email(s: &str) -> bool {
  if s.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && domain
      .split_once('.')
      .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
    && !domain.ends_with('.')
}
