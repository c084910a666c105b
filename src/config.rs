//! User configuration: friendly names and ignored devices.
//!
//! The document is TOML:
//!
//! ```toml
//! ignored = ["ZoomAudioDevice"]
//!
//! [friendly]
//! "UMC404HD 192k" = "DAC"
//! ```
//!
//! Loading is permissive: a missing file is an empty configuration, and
//! an unreadable or malformed one degrades to empty with a warning.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable overriding the default config location.
pub const CONFIG_PATH_ENV: &str = "AUDIOUT_CONFIG";

/// Default config location, relative to the home directory.
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/audiout.toml";

/// Configuration load errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Immutable per-invocation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Device identifier → display label.
    #[serde(default)]
    pub friendly: HashMap<String, String>,
    /// Device identifiers never offered for selection.
    #[serde(default)]
    pub ignored: Vec<String>,
}

impl Config {
    /// Parse a configuration document.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the configuration at `path`.
    ///
    /// A file that does not exist yields the empty configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(path, &text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "config not found; using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Load the configuration, falling back to empty on any error.
pub fn load_or_default(path: &Path) -> Config {
    match Config::load(path) {
        Ok(config) => {
            tracing::debug!(
                path = %path.display(),
                friendly = config.friendly.len(),
                ignored = config.ignored.len(),
                "config loaded"
            );
            config
        }
        Err(e) => {
            tracing::warn!(error = %e, "config unusable; continuing with empty configuration");
            Config::default()
        }
    }
}

/// Resolve the config path: explicit flag, then `$AUDIOUT_CONFIG`, then
/// the default. A leading `~` is expanded against the home directory.
pub fn resolve_path(flag: Option<&Path>, env: Option<OsString>) -> PathBuf {
    let raw = match (flag, env) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(value)) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    };
    expand_home(&raw, dirs::home_dir().as_deref())
}

/// Replace a leading `~` component with `home`, if known.
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
