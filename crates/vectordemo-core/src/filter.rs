//! List filters: reducing a set of filter values to query parameters.
//!
//! Each resource declares a [`FilterMap`] from filter name to [`ApiFilter`].
//! A value is sent only if every validator of its filter accepts it, and it
//! is run through the filter's [`Extractor`] before serialization. Values are
//! `Option<&Value>` so that "undefined" (`None`) and `null` stay distinct.

use std::collections::BTreeMap;

use serde_json::Value;

// ─── Validators ──────────────────────────────────────────────────────────────

pub fn is_defined(value: Option<&Value>) -> bool { value.is_some() }

pub fn is_not_null(value: Option<&Value>) -> bool { !matches!(value, Some(Value::Null)) }

pub fn is_not_blank(value: Option<&Value>) -> bool {
  !matches!(value, Some(Value::String(s)) if s.is_empty())
}

/// Only non-empty strings and arrays pass.
pub fn is_not_empty(value: Option<&Value>) -> bool {
  match value {
    Some(Value::String(s)) => !s.is_empty(),
    Some(Value::Array(a)) => !a.is_empty(),
    _ => false,
  }
}

pub fn is_defined_and_not_null(value: Option<&Value>) -> bool {
  is_defined(value) && is_not_null(value)
}

/// A check a filter value must pass to be included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterValidator {
  IsDefined,
  IsNotNull,
  IsNotBlank,
  IsNotEmpty,
  IsDefinedAndNotNull,
  Custom(fn(Option<&Value>) -> bool),
}

impl FilterValidator {
  pub fn accepts(&self, value: Option<&Value>) -> bool {
    match self {
      Self::IsDefined => is_defined(value),
      Self::IsNotNull => is_not_null(value),
      Self::IsNotBlank => is_not_blank(value),
      Self::IsNotEmpty => is_not_empty(value),
      Self::IsDefinedAndNotNull => is_defined_and_not_null(value),
      Self::Custom(f) => f(value),
    }
  }
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// How a validated value becomes one or more query-parameter values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
  /// Scalars as text; arrays and objects as JSON.
  Identity,
  /// Array items joined with the separator into a single value.
  Join(String),
  /// One parameter per array item, repeating the key.
  Expand,
  Custom(fn(&Value) -> Vec<String>),
}

impl Extractor {
  pub fn join(separator: impl Into<String>) -> Self { Self::Join(separator.into()) }

  pub fn extract(&self, value: &Value) -> Vec<String> {
    match (self, value) {
      (Self::Join(sep), Value::Array(items)) => {
        vec![items.iter().map(scalar_text).collect::<Vec<_>>().join(sep)]
      }
      (Self::Expand, Value::Array(items)) => items.iter().map(scalar_text).collect(),
      (Self::Custom(f), v) => f(v),
      (_, v) => vec![scalar_text(v)],
    }
  }
}

fn scalar_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

// ─── Filters ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFilter {
  /// Query-parameter key.
  pub key:        String,
  pub validators: Vec<FilterValidator>,
  pub extractor:  Extractor,
}

impl ApiFilter {
  /// A filter with the default validators (defined, not null, not blank)
  /// and the identity extractor.
  pub fn new(key: impl Into<String>) -> Self {
    Self {
      key:        key.into(),
      validators: vec![
        FilterValidator::IsDefinedAndNotNull,
        FilterValidator::IsNotBlank,
      ],
      extractor:  Extractor::Identity,
    }
  }

  pub fn with_validators(mut self, validators: Vec<FilterValidator>) -> Self {
    self.validators = validators;
    self
  }

  pub fn with_extractor(mut self, extractor: Extractor) -> Self {
    self.extractor = extractor;
    self
  }

  pub fn is_valid(&self, value: Option<&Value>) -> bool {
    self.validators.iter().all(|v| v.accepts(value))
  }
}

/// Filter name → filter, declared once per resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMap(BTreeMap<String, ApiFilter>);

impl FilterMap {
  pub fn new() -> Self { Self::default() }

  pub fn with(mut self, name: impl Into<String>, filter: ApiFilter) -> Self {
    self.0.insert(name.into(), filter);
    self
  }

  pub fn get(&self, name: &str) -> Option<&ApiFilter> { self.0.get(name) }
}

/// Current filter values. `None` marks a filter that is present but
/// undefined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterValues(BTreeMap<String, Option<Value>>);

impl FilterValues {
  pub fn new() -> Self { Self::default() }

  pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.0.insert(name.into(), Some(value.into()));
    self
  }

  pub fn set_undefined(mut self, name: impl Into<String>) -> Self {
    self.0.insert(name.into(), None);
    self
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
  }
}

/// Reduce `values` to query parameters. Values without a declared filter
/// are ignored.
pub fn build_params(filters: &FilterMap, values: &FilterValues) -> Vec<(String, String)> {
  let mut params = Vec::new();
  for (name, value) in values.iter() {
    let Some(filter) = filters.get(name) else {
      continue;
    };
    if !filter.is_valid(value) {
      continue;
    }
    if let Some(value) = value {
      params.extend(
        filter
          .extractor
          .extract(value)
          .into_iter()
          .map(|v| (filter.key.clone(), v)),
      );
    }
  }
  params
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn filters() -> FilterMap {
    FilterMap::new()
      .with("title", ApiFilter::new("title"))
      .with(
        "strict",
        ApiFilter::new("strict").with_validators(vec![
          FilterValidator::IsDefined,
          FilterValidator::IsNotBlank,
        ]),
      )
      .with(
        "ids",
        ApiFilter::new("ids")
          .with_validators(vec![FilterValidator::IsNotEmpty])
          .with_extractor(Extractor::join(",")),
      )
      .with(
        "tags",
        ApiFilter::new("tag")
          .with_validators(vec![FilterValidator::IsNotEmpty])
          .with_extractor(Extractor::Expand),
      )
  }

  #[test]
  fn blank_null_and_undefined_are_excluded() {
    for values in [
      FilterValues::new().set("title", ""),
      FilterValues::new().set("title", Value::Null),
      FilterValues::new().set_undefined("title"),
    ] {
      assert!(build_params(&filters(), &values).is_empty(), "{values:?}");
    }
  }

  #[test]
  fn valid_value_is_included_under_its_key() {
    let values = FilterValues::new().set("strict", "abc");
    assert_eq!(
      build_params(&filters(), &values),
      vec![("strict".to_owned(), "abc".to_owned())]
    );
  }

  #[test]
  fn arrays_join_or_expand() {
    let values = FilterValues::new()
      .set("ids", json!(["a", "b"]))
      .set("tags", json!(["x", "y"]));
    assert_eq!(
      build_params(&filters(), &values),
      vec![
        ("ids".to_owned(), "a,b".to_owned()),
        ("tag".to_owned(), "x".to_owned()),
        ("tag".to_owned(), "y".to_owned()),
      ]
    );
  }

  #[test]
  fn empty_arrays_fail_is_not_empty() {
    let values = FilterValues::new().set("ids", json!([]));
    assert!(build_params(&filters(), &values).is_empty());
  }

  #[test]
  fn unknown_filters_are_ignored() {
    let values = FilterValues::new().set("nope", "x");
    assert!(build_params(&filters(), &values).is_empty());
  }

  #[test]
  fn identity_stringifies_scalars() {
    assert_eq!(Extractor::Identity.extract(&json!(3)), vec!["3"]);
    assert_eq!(Extractor::Identity.extract(&json!(true)), vec!["true"]);
    assert_eq!(Extractor::Identity.extract(&json!("s")), vec!["s"]);
  }

  #[test]
  fn validator_semantics() {
    assert!(is_not_null(None));
    assert!(!is_not_null(Some(&Value::Null)));
    assert!(is_not_blank(None));
    assert!(!is_not_empty(Some(&json!(5))));
    assert!(!is_defined_and_not_null(None));
  }
}
