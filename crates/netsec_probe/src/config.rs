//! Probe configuration.
//!
//! Values are layered, lowest precedence first:
//! 1. bundled defaults (`netsec_probe.toml` shipped with the crate)
//! 2. `./netsec_probe.toml`, or an explicit file
//! 3. the connection string environment variables
//! 4. [`ConfigOverrides`], normally built from command-line flags

use crate::{ProbeError, ProbeErrorKind, ProbeResult};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../netsec_probe.toml");

/// Name of the optional user configuration file, without extension.
const CONFIG_FILE_STEM: &str = "netsec_probe";

/// Environment variables holding the connection string, in lookup order.
pub const CONNECTION_STRING_VARS: [&str; 2] = ["MONGO_DB_URL", "MONGODB_URL_KEY"];

/// Settings for a single connectivity check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProbeConfig {
    /// Connection string; usually taken from the environment
    #[serde(default)]
    pub connection_string: Option<String>,
    /// Database the `ping` command is run against
    pub database: String,
    /// Connect and server selection timeout
    pub timeout_seconds: u64,
    /// Application name reported to the server
    pub app_name: String,
}

impl ProbeConfig {
    /// Load defaults, `./netsec_probe.toml` if present, then the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file exists but cannot be parsed.
    pub fn load() -> ProbeResult<Self> {
        Self::load_from_dir(".", |name| std::env::var(name).ok())
    }

    /// Load defaults, `<dir>/netsec_probe.toml` if present, then the
    /// connection string variables resolved through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    #[instrument(skip(dir, lookup), fields(dir = %dir.as_ref().display()))]
    pub fn load_from_dir<F>(dir: impl AsRef<Path>, lookup: F) -> ProbeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Loading probe configuration: environment > netsec_probe.toml > bundled defaults");

        let user_config = dir.as_ref().join(CONFIG_FILE_STEM);
        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::with_name(&user_config.to_string_lossy()).required(false))
            .build()?
            .try_deserialize()?;

        Ok(config.with_env_connection_string(lookup))
    }

    /// Bundled defaults only, without files or environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled defaults fail to deserialize.
    pub fn bundled() -> ProbeResult<Self> {
        Ok(Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()?
            .try_deserialize()?)
    }

    /// Load defaults overlaid by the given file, then the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        Self::from_file_with(path, |name| std::env::var(name).ok())
    }

    /// Like [`ProbeConfig::from_file`], resolving connection string variables
    /// through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be parsed.
    #[instrument(skip(path, lookup), fields(path = %path.as_ref().display()))]
    pub fn from_file_with<F>(path: impl AsRef<Path>, lookup: F) -> ProbeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ProbeError::new(ProbeErrorKind::Config(format!(
                    "Failed to load {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()?;

        Ok(config.with_env_connection_string(lookup))
    }

    /// Replace the connection string with the first non-empty value found by
    /// `lookup` among [`CONNECTION_STRING_VARS`].
    ///
    /// The configured value is kept when no variable is set.
    pub fn with_env_connection_string<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some((name, value)) = resolve_connection_string(lookup) {
            debug!(variable = name, "Using connection string from environment");
            self.connection_string = Some(value);
        }
        self
    }

    /// Apply overrides on top of every other layer.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.connection_string {
            debug!("Using connection string from command line");
            self.connection_string = Some(url);
        }
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if let Some(timeout_seconds) = overrides.timeout_seconds {
            self.timeout_seconds = timeout_seconds;
        }
    }

    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// The connection string, or an error naming the variables to set.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeErrorKind::MissingConnectionString`] when unset or empty.
    #[track_caller]
    pub fn require_connection_string(&self) -> ProbeResult<&str> {
        match self.connection_string.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ProbeError::new(ProbeErrorKind::MissingConnectionString(
                CONNECTION_STRING_VARS[0],
                CONNECTION_STRING_VARS[1],
            ))),
        }
    }
}

/// Values that take precedence over files and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Connection string
    pub connection_string: Option<String>,
    /// Database the `ping` command is run against
    pub database: Option<String>,
    /// Connect and server selection timeout, in seconds
    pub timeout_seconds: Option<u64>,
}

/// Find the first non-empty connection string variable.
///
/// Returns the variable name together with its value.
///
/// # Examples
///
/// ```
/// use netsec_probe::resolve_connection_string;
///
/// let found = resolve_connection_string(|name| match name {
///     "MONGO_DB_URL" => Some(String::new()),
///     "MONGODB_URL_KEY" => Some("mongodb://db:27017".to_string()),
///     _ => None,
/// });
/// assert_eq!(found, Some(("MONGODB_URL_KEY", "mongodb://db:27017".to_string())));
/// ```
pub fn resolve_connection_string<F>(lookup: F) -> Option<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    CONNECTION_STRING_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.is_empty()).map(|v| (*name, v)))
}
