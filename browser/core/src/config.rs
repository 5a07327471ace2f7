//! Browser Configuration
//!
//! Configuration is layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`$XDG_CONFIG_HOME/bookrec/config.toml`, or an explicit path)
//! 3. Environment variables
//! 4. Command-line overrides
//!
//! # Example
//!
//! ```toml
//! completion_policy = "latest-only"
//!
//! [service]
//! host = "127.0.0.1"
//! port = 8000
//! timeout_secs = 120
//!
//! [search]
//! limit = 1000
//! ```
//!
//! # Environment Variables
//!
//! - `BOOKREC_HOST`, `BOOKREC_PORT`: service address
//! - `BOOKREC_TIMEOUT_SECS`: transport request timeout
//! - `BOOKREC_SEARCH_LIMIT`: result-count limit sent with every search
//! - `BOOKREC_COMPLETION_POLICY`: `latest-only` or `last-writer-wins`

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default service host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default service port
pub const DEFAULT_PORT: u16 = 8000;

/// Default transport request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default result-count limit for searches
pub const DEFAULT_SEARCH_LIMIT: usize = 1000;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that could not be parsed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// What to do with a completion that is no longer the latest request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionPolicy {
    /// Only the most recently issued request may change displayed state
    #[default]
    LatestOnly,
    /// Whichever request settles last overwrites displayed state
    LastWriterWins,
}

impl CompletionPolicy {
    /// Whether a completion for an older request should be applied
    pub fn applies_stale(self) -> bool {
        matches!(self, Self::LastWriterWins)
    }
}

impl fmt::Display for CompletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatestOnly => f.write_str("latest-only"),
            Self::LastWriterWins => f.write_str("last-writer-wins"),
        }
    }
}

impl FromStr for CompletionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latest-only" | "latest_only" | "latest" => Ok(Self::LatestOnly),
            "last-writer-wins" | "last_writer_wins" | "last" => Ok(Self::LastWriterWins),
            other => Err(ConfigError::Invalid(format!(
                "unknown completion policy '{other}'"
            ))),
        }
    }
}

/// Where the recommendation/explanation service lives
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Host name or address
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Transport request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Search behaviour
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Result-count limit sent with every search
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Full browser configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Service endpoint
    pub service: ServiceConfig,
    /// Search behaviour
    pub search: SearchConfig,
    /// Handling of out-of-order completions
    pub completion_policy: CompletionPolicy,
}

impl BrowserConfig {
    /// Defaults with environment overrides applied
    ///
    /// Malformed variables are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply `BOOKREC_*` environment variables on top of this config
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("BOOKREC_HOST") {
            self.service.host = host;
        }
        if let Some(port) = parse_var(&lookup, "BOOKREC_PORT") {
            self.service.port = port;
        }
        if let Some(secs) = parse_var(&lookup, "BOOKREC_TIMEOUT_SECS") {
            self.service.timeout_secs = secs;
        }
        if let Some(limit) = parse_var(&lookup, "BOOKREC_SEARCH_LIMIT") {
            self.search.limit = limit;
        }
        if let Some(policy) = parse_var(&lookup, "BOOKREC_COMPLETION_POLICY") {
            self.completion_policy = policy;
        }
    }

    /// Apply command-line overrides on top of this config
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref host) = overrides.host {
            self.service.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.service.port = port;
        }
        if let Some(limit) = overrides.limit {
            self.search.limit = limit;
        }
        if let Some(policy) = overrides.completion_policy {
            self.completion_policy = policy;
        }
    }

    /// Reject values the browser cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.host.trim().is_empty() {
            return Err(ConfigError::Invalid("service.host is empty".to_string()));
        }
        if self.service.port == 0 {
            return Err(ConfigError::Invalid("service.port must be non-zero".to_string()));
        }
        if self.service.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "service.timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.search.limit == 0 {
            return Err(ConfigError::Invalid("search.limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring malformed environment variable");
            None
        }
    }
}

/// Values supplied on the command line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Service host
    pub host: Option<String>,
    /// Service port
    pub port: Option<u16>,
    /// Search result limit
    pub limit: Option<usize>,
    /// Completion policy
    pub completion_policy: Option<CompletionPolicy>,
}

/// Where the loaded configuration came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file was found; built-in defaults
    Defaults,
    /// Loaded from this file
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaults => f.write_str("defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Default location of the config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bookrec").join("config.toml"))
}

/// Load the config file at `path`
///
/// Environment overrides are not applied here.
pub fn load_config_from_path(path: &Path) -> Result<BrowserConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from `explicit` (which must exist) or from the default
/// location (which may not), then apply environment variables and `overrides`
pub fn load_config(
    explicit: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<(BrowserConfig, ConfigSource), ConfigError> {
    let (mut config, source) = match explicit {
        Some(path) => (
            load_config_from_path(path)?,
            ConfigSource::File(path.to_path_buf()),
        ),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => (load_config_from_path(&path)?, ConfigSource::File(path)),
            None => (BrowserConfig::default(), ConfigSource::Defaults),
        },
    };

    config.apply_env();
    config.apply_overrides(overrides);
    config.validate()?;

    tracing::debug!(source = %source, "Configuration loaded");
    Ok((config, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BrowserConfig::default();
        assert_eq!(config.service.host, "127.0.0.1");
        assert_eq!(config.service.port, 8000);
        assert_eq!(config.search.limit, 1000);
        assert_eq!(config.completion_policy, CompletionPolicy::LatestOnly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "completion_policy = \"last-writer-wins\"\n\n[service]\nport = 9100\n"
        )
        .unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.service.port, 9100);
        assert_eq!(config.service.host, DEFAULT_HOST);
        assert_eq!(config.search.limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(config.completion_policy, CompletionPolicy::LastWriterWins);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[service]\nport = \"not a port\"").unwrap();

        assert!(matches!(
            load_config_from_path(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load_config(
            Some(Path::new("/definitely/not/here.toml")),
            &ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_env_vars_override_and_bad_values_are_ignored() {
        let vars: HashMap<&str, &str> = [
            ("BOOKREC_HOST", "books.internal"),
            ("BOOKREC_PORT", "eighty"),
            ("BOOKREC_SEARCH_LIMIT", "250"),
            ("BOOKREC_COMPLETION_POLICY", "last-writer-wins"),
        ]
        .into_iter()
        .collect();

        let mut config = BrowserConfig::default();
        config.apply_vars(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.service.host, "books.internal");
        assert_eq!(config.service.port, DEFAULT_PORT);
        assert_eq!(config.search.limit, 250);
        assert_eq!(config.completion_policy, CompletionPolicy::LastWriterWins);
    }

    #[test]
    fn test_overrides_win() {
        let mut config = BrowserConfig::default();
        config.apply_overrides(&ConfigOverrides {
            host: Some("localhost".to_string()),
            port: Some(8080),
            limit: Some(50),
            completion_policy: None,
        });
        assert_eq!(config.service.host, "localhost");
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.search.limit, 50);
        assert_eq!(config.completion_policy, CompletionPolicy::LatestOnly);
    }

    #[test]
    fn test_validate_rejects_zero_limit_port_and_timeout() {
        let mut config = BrowserConfig::default();
        config.search.limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = BrowserConfig::default();
        config.service.port = 0;
        assert!(config.validate().is_err());

        let mut config = BrowserConfig::default();
        config.service.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_rejects_zero_timeout_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[service]\ntimeout_secs = 0\n").unwrap();

        let result = load_config(Some(&path), &ConfigOverrides::default());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "latest-only".parse::<CompletionPolicy>().unwrap(),
            CompletionPolicy::LatestOnly
        );
        assert_eq!(
            "Last_Writer_Wins".parse::<CompletionPolicy>().unwrap(),
            CompletionPolicy::LastWriterWins
        );
        assert!("sometimes".parse::<CompletionPolicy>().is_err());
        assert_eq!(CompletionPolicy::LastWriterWins.to_string(), "last-writer-wins");
    }
}
