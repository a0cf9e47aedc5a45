//! `progression.toml` loading.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use progression_archive::{StreamListPaths, policy::PolicyKind};
use serde::Deserialize;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
  #[serde(default = "default_store_path")]
  pub store_path:            PathBuf,
  /// Policies in evaluation order.
  #[serde(default)]
  pub policies:              Vec<PolicyKind>,
  pub primary_stream_list:   Option<PathBuf>,
  pub secondary_stream_list: Option<PathBuf>,
}

fn default_store_path() -> PathBuf { PathBuf::from("progression.db") }

impl ArchiveConfig {
  /// Read `path` (if it exists) layered with `PROGRESSION_*` environment
  /// variables. Paths get a leading `~/` expanded.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("PROGRESSION")
          .list_separator(",")
          .with_list_parse_key("policies")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ArchiveConfig")?;

    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.primary_stream_list = cfg.primary_stream_list.as_deref().map(expand_tilde);
    cfg.secondary_stream_list = cfg.secondary_stream_list.as_deref().map(expand_tilde);
    Ok(cfg)
  }

  pub fn stream_lists(&self) -> StreamListPaths {
    StreamListPaths {
      primary:   self.primary_stream_list.clone(),
      secondary: self.secondary_stream_list.clone(),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
