//! Task configuration file resolution and loading
//!
//! Resolution follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. User config file (`<config dir>/<app>/config.toml`)
//! 4. Built-in defaults (no file)

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a task configuration file
pub const CONFIG_ENV_VAR: &str = "TAXODESC_CONFIG";

/// Where the task configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    UserConfig(PathBuf),
    Defaults,
}

impl ConfigSource {
    /// Path of the configuration file, if one was found
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::CommandLine(p)
            | ConfigSource::Environment(p)
            | ConfigSource::UserConfig(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CommandLine(p) => write!(f, "command line ({})", p.display()),
            ConfigSource::Environment(p) => write!(f, "environment ({})", p.display()),
            ConfigSource::UserConfig(p) => write!(f, "user config ({})", p.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Resolves which configuration file a run should use
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    app_name: String,
    env_var: String,
}

impl ConfigResolver {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            env_var: CONFIG_ENV_VAR.to_string(),
        }
    }

    /// Override the environment variable consulted in tier 2
    pub fn with_env_var(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = env_var.into();
        self
    }

    /// Resolve the configuration source
    ///
    /// An explicit command-line path is returned even if it does not exist, so
    /// that loading reports the missing file instead of silently falling back.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> ConfigSource {
        if let Some(path) = cli_arg {
            return ConfigSource::CommandLine(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(&self.env_var) {
            if !path.trim().is_empty() {
                return ConfigSource::Environment(PathBuf::from(path));
            }
        }

        if let Some(path) = user_config_path(&self.app_name) {
            if path.exists() {
                return ConfigSource::UserConfig(path);
            }
            debug!("No user config at {}", path.display());
        }

        ConfigSource::Defaults
    }
}

/// Default per-user configuration path for the platform
pub fn user_config_path(app_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(app_name).join("config.toml"))
}

/// Read and deserialize a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(format!("config file {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;
    let value = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    info!("Loaded configuration from {}", path.display());
    Ok(value)
}

/// Load configuration from a resolved source, falling back to `T::default()`
pub fn load_or_default<T: DeserializeOwned + Default>(source: &ConfigSource) -> Result<T> {
    match source.path() {
        Some(path) => load_toml(path),
        None => {
            info!("No configuration file found, using built-in defaults");
            Ok(T::default())
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_defaults() {
        let config: LoggingConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, "info");
        assert!(config.file.is_none());
        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    fn test_cli_arg_wins_even_if_missing() {
        let resolver = ConfigResolver::new("taxodesc-test").with_env_var("TAXODESC_TEST_UNSET_VAR");
        let source = resolver.resolve(Some(Path::new("/nonexistent/task.toml")));
        assert_eq!(
            source,
            ConfigSource::CommandLine(PathBuf::from("/nonexistent/task.toml"))
        );
    }

    #[test]
    fn test_defaults_have_no_path() {
        assert!(ConfigSource::Defaults.path().is_none());
        assert_eq!(ConfigSource::Defaults.to_string(), "built-in defaults");
    }
}
