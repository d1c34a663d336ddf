//! `/users/` and the account operations around it.

use std::sync::Arc;

use serde_json::Value;
use vectordemo_core::{
  Model, NoInput, Record, Shape,
  models::{ForgotPassword, LoginCredentials, PasswordReset, User, UserCreate},
};

use crate::{
  CallUtils, CustomCall, HttpClient, ResourceApi, Result, transport::Transport,
};

pub const USERS_URI: &str = "/users/";

pub type UserApi<T> = ResourceApi<T, User, UserCreate>;

pub fn user_api<T: Transport>(client: Arc<HttpClient<T>>) -> UserApi<T> {
  ResourceApi::new(client, USERS_URI)
}

// ─── Operations ──────────────────────────────────────────────────────────────

/// `POST /login/` → the user, with a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Login;

impl CustomCall for Login {
  type Input = LoginCredentials;
  type Output = User;

  fn output_shape(&self) -> Option<Shape> { Some(User::shape()) }

  async fn handle<T: Transport>(
    &self,
    client: &HttpClient<T>,
    input: Record,
    utils: &CallUtils,
  ) -> Result<User> {
    let wire = client.post("/login/", utils.to_api(&input)).await?;
    utils.from_api(&wire)
  }
}

/// `POST /logout/`
#[derive(Debug, Clone, Copy, Default)]
pub struct Logout;

impl CustomCall for Logout {
  type Input = NoInput;
  type Output = ();

  async fn handle<T: Transport>(
    &self,
    client: &HttpClient<T>,
    input: Record,
    utils: &CallUtils,
  ) -> Result<()> {
    client.post("/logout/", utils.to_api(&input)).await?;
    Ok(())
  }
}

/// `POST /password/reset/` with `{ "email": … }`. The server answers the
/// same whether or not the address is known.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestPasswordReset;

impl CustomCall for RequestPasswordReset {
  type Input = ForgotPassword;
  type Output = ();

  async fn handle<T: Transport>(
    &self,
    client: &HttpClient<T>,
    input: Record,
    utils: &CallUtils,
  ) -> Result<()> {
    client.post("/password/reset/", utils.to_api(&input)).await?;
    Ok(())
  }
}

/// `POST /password/reset/confirm/<uid>/<token>/` with `{ "password": … }`
/// → the user, with a fresh token.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetPassword;

impl CustomCall for ResetPassword {
  type Input = PasswordReset;
  type Output = User;

  fn output_shape(&self) -> Option<Shape> { Some(User::shape()) }

  async fn handle<T: Transport>(
    &self,
    client: &HttpClient<T>,
    input: Record,
    utils: &CallUtils,
  ) -> Result<User> {
    let uid = text(&input, "uid");
    let token = text(&input, "token");
    let mut body = utils.to_api(&input);
    if let Some(map) = body.as_object_mut() {
      map.remove("uid");
      map.remove("token");
    }
    let path = format!("/password/reset/confirm/{uid}/{token}/");
    let wire = client.post(&path, body).await?;
    utils.from_api(&wire)
  }
}

fn text(record: &Record, key: &str) -> String {
  record.get(key).and_then(Value::as_str).unwrap_or_default().to_owned()
}

// ─── Convenience ─────────────────────────────────────────────────────────────

impl<T: Transport> ResourceApi<T, User, UserCreate> {
  pub async fn login(&self, credentials: LoginCredentials) -> Result<User> {
    self.call(&Login, credentials).await
  }

  pub async fn logout(&self) -> Result<()> { self.call(&Logout, NoInput {}).await }

  /// Creates the account; the returned user carries a token.
  pub async fn signup(&self, input: &UserCreate) -> Result<User> { self.create(input).await }

  pub async fn request_password_reset(&self, input: ForgotPassword) -> Result<()> {
    self.call(&RequestPasswordReset, input).await
  }

  pub async fn reset_password(&self, input: PasswordReset) -> Result<User> {
    self.call(&ResetPassword, input).await
  }
}
