//! Command handlers. Each one drives the client and session the way the
//! corresponding page of the web app does.

use std::{path::Path, sync::Arc};

use anyhow::{Context as _, Result, anyhow, bail};
use serde_json::json;
use uuid::Uuid;
use vectordemo_client::{
  ErrorHandler, ErrorHandlerOptions, HttpClient, JobDescriptionApi, ReqwestTransport, UserApi,
  job_description_api, user_api,
};
use vectordemo_core::{
  Record,
  filter::FilterValues,
  form::FormValues,
  models::{
    ForgotPassword, JobDescription, LoginCredentials, Pagination,
    PasswordReset, User, UserCreate,
    users::{login_form, password_reset_form, request_password_reset_form, signup_form},
  },
};
use vectordemo_session::{
  SessionStore, StorageKey,
  guard::{Navigation, navigate},
};
use vectordemo_storage_sqlite::SqliteStorage;

use crate::settings::Settings;

pub struct SignupInput {
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub password:   String,
  pub confirm:    String,
}

#[derive(Debug, Default)]
pub struct JobFilters {
  pub title:    Option<String>,
  pub company:  Option<String>,
  pub location: Option<String>,
  pub language: Option<String>,
  pub ids:      Vec<Uuid>,
  pub ordering: Option<String>,
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  session: Arc<SessionStore>,
  users:   UserApi<ReqwestTransport>,
  jobs:    JobDescriptionApi<ReqwestTransport>,
  errors:  ErrorHandler,
}

impl App {
  pub fn open(settings: &Settings, storage_path: &Path) -> Result<Self> {
    let storage = SqliteStorage::open(storage_path)?;
    let session = Arc::new(SessionStore::load(Arc::new(storage), StorageKey::app())?);

    let transport = ReqwestTransport::new(&settings.client_config())?;
    let http = Arc::new(
      HttpClient::new(transport, session.clone()).with_csrf_token(settings.csrf_token.clone()),
    );

    Ok(Self {
      session,
      users: user_api(http.clone()),
      jobs: job_description_api(http),
      errors: ErrorHandler::new(ErrorHandlerOptions {
        api_name:         "vectordemo".to_owned(),
        enable_400_alert: true,
        enable_500_alert: true,
        rethrow_errors:   false,
      }),
    })
  }

  /// Turn a failed call into a user-facing error.
  fn check<T>(&self, result: vectordemo_client::Result<T>) -> Result<T> {
    match result {
      Ok(v) => Ok(v),
      Err(err) => match self.errors.handle(err) {
        Ok(Some(message)) => Err(anyhow!(message)),
        Ok(None) => bail!("request failed"),
        Err(err) => Err(err.into()),
      },
    }
  }

  /// Mirror the web app's route guard before running a page's command.
  fn enter(&self, path: &str) -> Result<()> {
    match navigate(path, self.session.is_logged_in()) {
      Navigation::Allow(_) => Ok(()),
      Navigation::Redirect { to, .. } => bail!("{path} is not available here; go to {to}"),
    }
  }

  fn signed_in(&self, user: User) -> Result<()> {
    println!("Signed in as {} <{}>", display_name(&user), user.email);
    self.session.set_user(Some(user)).context("saving session")
  }

  // ── Account ─────────────────────────────────────────────────────────────

  pub async fn login(&self, email: String, password: String) -> Result<()> {
    self.enter("/login")?;
    validate_form(login_form(), [("email", &email), ("password", &password)])?;
    let result = self.users.login(LoginCredentials { email, password }).await;
    let user = self.check(result)?;
    self.signed_in(user)
  }

  pub async fn signup(&self, input: SignupInput) -> Result<()> {
    self.enter("/signup")?;
    validate_form(
      signup_form(),
      [
        ("email", &input.email),
        ("firstName", &input.first_name),
        ("lastName", &input.last_name),
        ("password", &input.password),
        ("confirmPassword", &input.confirm),
      ],
    )?;
    let create = UserCreate {
      email:      input.email,
      first_name: input.first_name,
      last_name:  input.last_name,
      password:   input.password,
    };
    let result = self.users.signup(&create).await;
    let user = self.check(result)?;
    self.signed_in(user)
  }

  pub async fn logout(&self) -> Result<()> {
    if self.session.is_logged_in() {
      let result = self.users.logout().await;
      if let Err(err) = self.check(result) {
        tracing::warn!(error = %err, "server logout failed; clearing local session");
      }
    }
    self.session.logout().context("clearing session")?;
    println!("Signed out");
    Ok(())
  }

  pub fn whoami(&self) -> Result<()> {
    match self.session.current_user() {
      Some(user) if self.session.is_logged_in() => {
        println!("{} <{}> ({})", display_name(&user), user.email, user.id)
      }
      _ => println!("Not signed in"),
    }
    Ok(())
  }

  pub async fn request_password_reset(&self, email: String) -> Result<()> {
    self.enter("/password/request-reset/")?;
    validate_form(request_password_reset_form(), [("email", &email)])?;
    let result = self.users.request_password_reset(ForgotPassword { email }).await;
    self.check(result)?;
    println!("If an account exists for that address, a reset link is on its way.");
    Ok(())
  }

  pub async fn reset_password(
    &self,
    uid: String,
    token: String,
    password: String,
    confirm: String,
  ) -> Result<()> {
    self.enter(&format!("/password/reset/confirm/{uid}/{token}"))?;
    validate_form(
      password_reset_form(),
      [("password", &password), ("confirmPassword", &confirm)],
    )?;
    let result = self.users.reset_password(PasswordReset { uid, token, password }).await;
    let user = self.check(result)?;
    self.signed_in(user)
  }

  // ── Job descriptions ────────────────────────────────────────────────────

  pub async fn search(&self, query: String) -> Result<()> {
    self.enter("/dashboard")?;
    let result = self.jobs.search(query).await;
    let results = self.check(result)?;
    if results.is_empty() {
      println!("No matches");
    }
    for r in results {
      println!("{:.3}  {}", r.score, summary(&r.job_description));
      if let Some(chunk) = r.chunks.first() {
        println!("       {}", chunk.chunk.trim());
      }
    }
    Ok(())
  }

  pub async fn list_jobs(&self, filters: JobFilters, page: u32, page_size: u32) -> Result<()> {
    self.enter("/dashboard")?;
    let mut values = FilterValues::new();
    for (name, value) in [
      ("title", filters.title),
      ("company", filters.company),
      ("location", filters.location),
      ("language", filters.language),
      ("ordering", filters.ordering),
    ] {
      if let Some(value) = value {
        values = values.set(name, value);
      }
    }
    if !filters.ids.is_empty() {
      values = values.set("ids", json!(filters.ids));
    }

    let result = self.jobs.list(&values, Pagination { page, size: page_size }).await;
    let page_data = self.check(result)?;
    for job in &page_data.results {
      println!("{}  {}", job.id, summary(job));
    }
    println!(
      "page {page}: {} of {} job descriptions",
      page_data.results.len(),
      page_data.count
    );
    Ok(())
  }

  pub async fn get_job(&self, id: Uuid) -> Result<()> {
    self.enter("/dashboard")?;
    let result = self.jobs.retrieve(id).await;
    let job = self.check(result)?;
    println!("{}", serde_json::to_string_pretty(&job)?);
    Ok(())
  }

  pub async fn update_job(
    &self,
    id: Uuid,
    fields: impl IntoIterator<Item = (&'static str, Option<String>)>,
  ) -> Result<()> {
    self.enter("/dashboard")?;
    let mut partial = Record::new();
    for (name, value) in fields {
      if let Some(value) = value {
        partial.insert(name, value);
      }
    }
    if partial.is_empty() {
      bail!("nothing to update");
    }
    let result = self.jobs.update(id, partial).await;
    let job = self.check(result)?;
    println!("Updated {}  {}", job.id, summary(&job));
    Ok(())
  }

  // ── Navigation ──────────────────────────────────────────────────────────

  pub fn navigate(&self, path: &str) -> Result<()> {
    match navigate(path, self.session.is_logged_in()) {
      Navigation::Allow(m) => {
        print!("{}", m.route.name);
        for (k, v) in &m.params {
          print!(" {k}={v}");
        }
        println!();
      }
      Navigation::Redirect { to, query } => {
        print!("→ {to}");
        for (k, v) in &query {
          print!(" {k}={v}");
        }
        println!();
      }
    }
    Ok(())
  }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn validate_form<'a>(
  form: vectordemo_core::form::FormDescriptor,
  values: impl IntoIterator<Item = (&'a str, &'a String)>,
) -> Result<()> {
  let values: FormValues = values
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.clone()))
    .collect();
  form.validate(&values).map_err(|err| {
    let lines: Vec<_> = err
      .field_errors()
      .into_iter()
      .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
      .collect();
    anyhow!(lines.join("\n"))
  })
}

fn display_name(user: &User) -> String {
  user
    .full_name
    .clone()
    .unwrap_or_else(|| format!("{} {}", user.first_name, user.last_name))
}

fn summary(job: &JobDescription) -> String {
  let mut parts = vec![job.title.clone()];
  parts.extend(job.company.clone());
  parts.extend(job.location.clone());
  parts.join(" · ")
}
