//! User configuration for studio.
//!
//! Read from `$XDG_CONFIG_HOME/studio/config.toml` (or `~/.config/studio/config.toml`).
//! Every field is optional. A missing file is normal; an unreadable or unparsable
//! file is a soft failure that logs a warning and falls back to the defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use studio_core::LabelOption;
use tracing::{debug, warn};

/// Default location of the durable session store, relative to the working directory.
pub const DEFAULT_DATABASE: &str = ".studio/studio.db";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Theme name, see [`crate::theme::Theme::from_name`].
    pub theme: String,
    /// Path of the durable key-value store.
    pub database: PathBuf,
    /// Directory exports are written to.
    pub output_dir: PathBuf,
    /// Label-options catalog shown in the picker, in order.
    pub labels: Vec<LabelOption>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            database: PathBuf::from(DEFAULT_DATABASE),
            output_dir: PathBuf::from("."),
            labels: default_labels(),
        }
    }
}

/// Catalog used when the config file defines no labels.
pub fn default_labels() -> Vec<LabelOption> {
    vec![
        LabelOption::new("feat", "Feature"),
        LabelOption::new("fix", "Bug fix"),
        LabelOption::new("refactor", "Refactor"),
        LabelOption::new("docs", "Documentation"),
        LabelOption::new("test", "Tests"),
        LabelOption::new("chore", "Chore"),
    ]
}

/// Returns the path to the studio config file.
///
/// Prefers `$XDG_CONFIG_HOME/studio/config.toml`; falls back to
/// `~/.config/studio/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("studio").join("config.toml")
}

/// Loads the config from `path`, or from [`config_path`] when `path` is `None`.
///
/// Never fails: problems are logged and the defaults are returned.
pub fn load(path: Option<&Path>) -> StudioConfig {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let raw = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no config file, using defaults");
            return StudioConfig::default();
        }
    };
    match toml::from_str::<StudioConfig>(&raw) {
        Ok(mut config) => {
            if config.labels.is_empty() {
                config.labels = default_labels();
            }
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config parse error, using defaults");
            StudioConfig::default()
        }
    }
}
