use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file read from the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "dodle.toml";
/// Catalog used when neither the config file nor the command line names one.
pub(crate) const DEFAULT_CATALOG_PATH: &str = "assets/catalog.toml";
/// Progress store used when neither the config file nor the command line names one.
pub(crate) const DEFAULT_STORE_PATH: &str = "progress.json";
/// Log filter used when `RUST_LOG` is unset.
pub(crate) const DEFAULT_LOG_FILTER: &str = "warn,dodle=info";

/// Settings read from `dodle.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Puzzle catalog location.
    pub(crate) catalog: Option<PathBuf>,
    /// Progress store location.
    pub(crate) store: Option<PathBuf>,
    /// `tracing` filter directive applied when `RUST_LOG` is unset.
    pub(crate) log_filter: Option<String>,
}

impl Config {
    /// Loads the config file at `path`, or the default file if it exists.
    ///
    /// An explicitly requested file must exist; the default file is optional.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.is_file() {
                    Self::from_path(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    /// Log filter directive to fall back on.
    pub(crate) fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
