//! Form descriptors: field name → validators, plus cross-field rules,
//! evaluated by a single routine.

use std::collections::BTreeMap;

use crate::{
  error::{FieldIssue, ValidationError},
  field::looks_like_email,
};

/// Raw form input, keyed by internal field name.
pub type FormValues = BTreeMap<String, String>;

/// A check on a single field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValidator {
  Required,
  Email,
  MinLength { min: usize, message: String },
}

impl FieldValidator {
  pub fn min_length(min: usize) -> Self {
    Self::MinLength { min, message: format!("Minimum Length of {min} required") }
  }

  fn check(&self, value: &str) -> Option<String> {
    match self {
      Self::Required if value.trim().is_empty() => Some("This field is required".into()),
      // An empty value is `Required`'s concern.
      Self::Email if !value.is_empty() && !looks_like_email(value) => {
        Some("Please enter a valid email".into())
      }
      Self::MinLength { min, message } if value.chars().count() < *min => {
        Some(message.clone())
      }
      _ => None,
    }
  }
}

/// A check that compares a field against another field of the same form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossFieldValidator {
  MustMatch { matcher: String },
}

impl CrossFieldValidator {
  pub fn must_match(matcher: impl Into<String>) -> Self {
    Self::MustMatch { matcher: matcher.into() }
  }

  fn check(&self, value: &str, values: &FormValues) -> Option<String> {
    match self {
      Self::MustMatch { matcher } => {
        let other = values.get(matcher).map(String::as_str).unwrap_or_default();
        (value != other).then(|| format!("Value must match field: {matcher}"))
      }
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDescriptor {
  fields: Vec<(String, Vec<FieldValidator>)>,
  cross:  Vec<(String, Vec<CrossFieldValidator>)>,
}

impl FormDescriptor {
  pub fn new() -> Self { Self::default() }

  pub fn field(mut self, name: impl Into<String>, validators: Vec<FieldValidator>) -> Self {
    self.fields.push((name.into(), validators));
    self
  }

  pub fn cross_field(
    mut self,
    name: impl Into<String>,
    validators: Vec<CrossFieldValidator>,
  ) -> Self {
    self.cross.push((name.into(), validators));
    self
  }

  pub fn field_names(&self) -> impl Iterator<Item = &str> {
    self.fields.iter().map(|(n, _)| n.as_str())
  }

  /// Run every validator; a missing value is treated as the empty string.
  pub fn validate(&self, values: &FormValues) -> Result<(), ValidationError> {
    let value_of = |name: &str| -> String { values.get(name).cloned().unwrap_or_default() };

    let mut issues = Vec::new();
    for (name, validators) in &self.fields {
      let value = value_of(name);
      for message in validators.iter().filter_map(|v| v.check(&value)) {
        issues.push(FieldIssue::new(name.as_str(), message));
      }
    }
    for (name, validators) in &self.cross {
      let value = value_of(name);
      for message in validators.iter().filter_map(|v| v.check(&value, values)) {
        issues.push(FieldIssue::new(name.as_str(), message));
      }
    }

    if issues.is_empty() {
      Ok(())
    } else {
      Err(ValidationError::new(issues))
    }
  }
}
