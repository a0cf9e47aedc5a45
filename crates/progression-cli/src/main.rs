//! progression-archive binary.
//!
//! Reads `progression.toml` (or the path given with `--config`), opens the
//! SQLite event log and runs one subcommand against it.

mod commands;
mod settings;

use std::{
  fs::File,
  io::{self, BufRead, BufReader},
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use progression_archive::{ArchivalEngine, policy::PolicyKind};
use progression_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::settings::{ArchiveConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Progression event archival")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "progression.toml", global = true)]
  config: PathBuf,

  /// SQLite event log; overrides `store_path`.
  #[arg(long, env = "PROGRESSION_STORE_PATH", global = true)]
  store: Option<PathBuf>,

  /// Policy to apply, in order. Repeat to chain; replaces `policies`.
  #[arg(short, long = "policy", global = true)]
  policies: Vec<PolicyKind>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Append newline-delimited JSON events to the store.
  Import {
    file: PathBuf,
  },
  /// Print one decision per event without touching the store.
  Decide {
    /// NDJSON events; stdin when absent.
    file: Option<PathBuf>,
  },
  /// Decide every active event in the store and apply the decisions.
  Run {
    #[arg(long)]
    dry_run: bool,
  },
  /// Evaluate a JSON path against a document.
  Extract {
    path: String,
    /// JSON document; stdin when absent.
    file: Option<PathBuf>,
    /// Return the last match instead of the first.
    #[arg(long)]
    last: bool,
  },
  /// Rebuild the case-progression state of a stream.
  Replay {
    stream_id: Uuid,
  },
  /// Record additional information for a defendant on a case stream.
  AddDefendantInfo {
    stream_id:    Uuid,
    #[arg(long)]
    case_id:      Uuid,
    #[arg(long)]
    defendant_id: Uuid,
    /// Free-form JSON value.
    #[arg(long, default_value = "null")]
    info:         String,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing. Logs go to stderr; stdout carries command output.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg = ArchiveConfig::load(&cli.config)?;
  if let Some(store) = &cli.store {
    cfg.store_path = expand_tilde(store);
  }
  if !cli.policies.is_empty() {
    cfg.policies = cli.policies.clone();
  }

  match cli.command {
    Command::Import { file } => {
      let store = open_store(&cfg).await?;
      let count = commands::import(&store, open_input(Some(file.as_path()))?).await?;
      println!("imported {count} events");
    }
    Command::Decide { file } => {
      let engine = build_engine(&cfg)?;
      commands::decide(&engine, open_input(file.as_deref())?, io::stdout())?;
    }
    Command::Run { dry_run } => {
      let engine = build_engine(&cfg)?;
      let store = open_store(&cfg).await?;
      commands::run(&store, &engine, dry_run, io::stdout()).await?;
    }
    Command::Extract { path, file, last } => {
      if let Some(value) = commands::extract(&path, open_input(file.as_deref())?, last)? {
        println!("{value}");
      }
    }
    Command::Replay { stream_id } => {
      let store = open_store(&cfg).await?;
      commands::replay(&store, stream_id, io::stdout()).await?;
    }
    Command::AddDefendantInfo {
      stream_id,
      case_id,
      defendant_id,
      info,
    } => {
      let info = serde_json::from_str(&info).context("--info is not valid JSON")?;
      let store = open_store(&cfg).await?;
      let appended =
        commands::add_defendant_info(&store, stream_id, case_id, defendant_id, info).await?;
      for event in appended {
        println!("{}", event.record.event_id);
      }
    }
  }

  Ok(())
}

async fn open_store(cfg: &ArchiveConfig) -> anyhow::Result<SqliteStore> {
  SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))
}

fn build_engine(cfg: &ArchiveConfig) -> anyhow::Result<ArchivalEngine> {
  if cfg.policies.is_empty() {
    anyhow::bail!("no policies configured; set `policies` or pass --policy");
  }
  let engine = ArchivalEngine::from_kinds(&cfg.policies, &cfg.stream_lists())
    .context("failed to build archival policies")?;
  tracing::info!(policies = ?engine.policy_names(), "archival engine ready");
  Ok(engine)
}

/// Open `path` for reading, or stdin when `None`.
fn open_input(path: Option<&Path>) -> anyhow::Result<Box<dyn BufRead>> {
  Ok(match path {
    Some(path) => {
      let file = File::open(path).with_context(|| format!("failed to open {path:?}"))?;
      Box::new(BufReader::new(file))
    }
    None => Box::new(BufReader::new(io::stdin())),
  })
}
