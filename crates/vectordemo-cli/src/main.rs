//! `vectordemo`: command-line front end for the job-description search API.
//!
//! # Usage
//!
//! ```
//! vectordemo --url http://localhost:8000 login jane@example.com
//! vectordemo search "choir director"
//! vectordemo --config ~/.config/vectordemo/config.toml jobs list --title Cantor
//! ```

mod app;
mod settings;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use app::App;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vectordemo", version, about = "Job-description search client")]
struct Args {
  /// Path to a TOML config file (base_url, storage_path, csrf_token,
  /// timeout_secs).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Server origin (default: http://localhost:8000).
  #[arg(long, env = "VECTORDEMO_URL")]
  url: Option<String>,

  /// Session database path.
  #[arg(long, value_name = "PATH")]
  storage: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Sign in and remember the session.
  Login {
    email:    String,
    /// Read from stdin when omitted.
    #[arg(long, env = "VECTORDEMO_PASSWORD", hide_env_values = true)]
    password: Option<String>,
  },

  /// Create an account and sign in.
  Signup {
    email:      String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name:  String,
    /// Read from stdin (twice) when omitted.
    #[arg(long, env = "VECTORDEMO_PASSWORD", hide_env_values = true)]
    password:   Option<String>,
  },

  /// Sign out and forget the session.
  Logout,

  /// Show the signed-in user.
  Whoami,

  /// Semantic search over job descriptions.
  Search { query: String },

  #[command(subcommand)]
  Jobs(JobsCommand),

  #[command(subcommand)]
  Password(PasswordCommand),

  /// Show where navigating to an app path would lead.
  Open { path: String },
}

/// The server exposes list, retrieve and update for job descriptions.
#[derive(Subcommand, Debug)]
enum JobsCommand {
  List {
    #[arg(long)]
    title:     Option<String>,
    #[arg(long)]
    company:   Option<String>,
    #[arg(long)]
    location:  Option<String>,
    #[arg(long)]
    language:  Option<String>,
    /// Restrict to these ids (repeatable).
    #[arg(long = "id")]
    ids:       Vec<Uuid>,
    #[arg(long)]
    ordering:  Option<String>,
    #[arg(long, default_value_t = 1)]
    page:      u32,
    #[arg(long, default_value_t = vectordemo_core::models::page::DEFAULT_PAGE_SIZE)]
    page_size: u32,
  },
  Get {
    id: Uuid,
  },
  /// Change only the given fields.
  Update {
    id:          Uuid,
    #[arg(long)]
    title:       Option<String>,
    #[arg(long)]
    company:     Option<String>,
    #[arg(long)]
    location:    Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    skills:      Option<String>,
    #[arg(long)]
    language:    Option<String>,
  },
}

#[derive(Subcommand, Debug)]
enum PasswordCommand {
  /// Email a reset link.
  RequestReset { email: String },
  /// Set a new password from a reset link's uid and token, and sign in.
  Reset {
    uid:      String,
    token:    String,
    #[arg(long, env = "VECTORDEMO_PASSWORD", hide_env_values = true)]
    password: Option<String>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let mut settings = settings::Settings::load(args.config.as_deref())?;
  if let Some(url) = args.url {
    settings.base_url = url;
  }
  if let Some(storage) = args.storage {
    settings.storage_path = storage;
  }
  let storage_path = expand_tilde(&settings.storage_path);
  tracing::debug!(base_url = %settings.base_url, storage = %storage_path.display(), "starting");

  let app = App::open(&settings, &storage_path)
    .with_context(|| format!("failed to open session at {}", storage_path.display()))?;

  match args.command {
    Command::Login { email, password } => {
      let password = password_or_prompt(password, "Password: ")?;
      app.login(email, password).await
    }
    Command::Signup { email, first_name, last_name, password } => {
      let (password, confirm) = match password {
        Some(p) => (p.clone(), p),
        None => (prompt("Password: ")?, prompt("Confirm password: ")?),
      };
      app
        .signup(app::SignupInput { email, first_name, last_name, password, confirm })
        .await
    }
    Command::Logout => app.logout().await,
    Command::Whoami => app.whoami(),
    Command::Search { query } => app.search(query).await,
    Command::Jobs(cmd) => match cmd {
      JobsCommand::List {
        title,
        company,
        location,
        language,
        ids,
        ordering,
        page,
        page_size,
      } => {
        let filters = app::JobFilters { title, company, location, language, ids, ordering };
        app.list_jobs(filters, page, page_size).await
      }
      JobsCommand::Get { id } => app.get_job(id).await,
      JobsCommand::Update { id, title, company, location, description, skills, language } => {
        let fields = [
          ("title", title),
          ("company", company),
          ("location", location),
          ("description", description),
          ("skills", skills),
          ("language", language),
        ];
        app.update_job(id, fields).await
      }
    },
    Command::Password(cmd) => match cmd {
      PasswordCommand::RequestReset { email } => app.request_password_reset(email).await,
      PasswordCommand::Reset { uid, token, password } => {
        let (password, confirm) = match password {
          Some(p) => (p.clone(), p),
          None => (prompt("New password: ")?, prompt("Confirm password: ")?),
        };
        app.reset_password(uid, token, password, confirm).await
      }
    },
    Command::Open { path } => app.navigate(&path),
  }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn password_or_prompt(password: Option<String>, label: &str) -> Result<String> {
  match password {
    Some(p) => Ok(p),
    None => prompt(label),
  }
}

/// Read one line from stdin.
fn prompt(label: &str) -> Result<String> {
  use std::io::{self, BufRead, Write};
  eprint!("{label}");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line).context("reading stdin")?;
  Ok(line.trim_end_matches(['\n', '\r']).to_owned())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
