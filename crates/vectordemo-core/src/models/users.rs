//! User models and the forms that feed them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  field::Field,
  form::{CrossFieldValidator, FieldValidator, FormDescriptor},
  record::Model,
  shape::Shape,
};

// ─── Entity ──────────────────────────────────────────────────────────────────

/// An account as returned by the API. `token` is only present on responses
/// to login, signup and password reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:               Uuid,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub datetime_created: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_edited:      Option<DateTime<Utc>>,
  pub email:            String,
  pub first_name:       String,
  pub last_name:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub full_name:        Option<String>,
  #[serde(default)]
  pub token:            Option<String>,
}

impl Model for User {
  fn shape() -> Shape {
    Shape::base()
      .field("email", Field::email())
      .field("firstName", Field::string())
      .field("lastName", Field::string())
      .field("fullName", Field::string().optional().read_only())
      .field("token", Field::string().nullable().optional().read_only())
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Signup payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub password:   String,
}

impl Model for UserCreate {
  fn shape() -> Shape {
    User::shape()
      .pick(&["email", "firstName", "lastName"])
      .field("password", Field::string())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
  pub email:    String,
  pub password: String,
}

impl Model for LoginCredentials {
  fn shape() -> Shape {
    Shape::new()
      .field("email", Field::email())
      .field("password", Field::string())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPassword {
  pub email: String,
}

impl Model for ForgotPassword {
  fn shape() -> Shape { Shape::new().field("email", Field::email()) }
}

/// Confirmation of a password reset link: `uid` and `token` come from the
/// emailed link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
  pub uid:      String,
  pub token:    String,
  pub password: String,
}

impl Model for PasswordReset {
  fn shape() -> Shape {
    Shape::new()
      .field("uid", Field::string())
      .field("token", Field::string())
      .field("password", Field::string())
  }
}

// ─── Forms ───────────────────────────────────────────────────────────────────

pub fn login_form() -> FormDescriptor {
  FormDescriptor::new()
    .field("email", vec![FieldValidator::Required, FieldValidator::Email])
    .field("password", vec![FieldValidator::Required])
}

pub fn signup_form() -> FormDescriptor {
  FormDescriptor::new()
    .field("firstName", vec![FieldValidator::Required])
    .field("lastName", vec![FieldValidator::Required])
    .field("email", vec![FieldValidator::Required, FieldValidator::Email])
    .field("password", vec![FieldValidator::min_length(8)])
    .field("confirmPassword", vec![])
    .cross_field("confirmPassword", vec![CrossFieldValidator::must_match("password")])
}

pub fn request_password_reset_form() -> FormDescriptor {
  FormDescriptor::new().field("email", vec![FieldValidator::Required, FieldValidator::Email])
}

pub fn password_reset_form() -> FormDescriptor {
  FormDescriptor::new()
    .field(
      "password",
      vec![FieldValidator::Required, FieldValidator::min_length(8)],
    )
    .field("confirmPassword", vec![])
    .cross_field("confirmPassword", vec![CrossFieldValidator::must_match("password")])
}
