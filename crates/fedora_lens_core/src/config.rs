//! Store endpoint configuration.
//!
//! # Responsibility
//! - Describe where the resource store lives (`host`) and which path prefix
//!   scopes every record id (`base_path`).
//! - Load from TOML with environment overrides.
//!
//! # Invariants
//! - `host` is an http(s) URL without a trailing `/`.
//! - `base_path` is empty or starts with `/` and has no trailing `/`.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const DEFAULT_HOST: &str = "http://localhost:8983/fedora/rest";
pub const HOST_ENV: &str = "FEDORA_LENS_HOST";
pub const BASE_PATH_ENV: &str = "FEDORA_LENS_BASE_PATH";

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read config file: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config file: {err}"),
            Self::Invalid(message) => write!(f, "invalid store config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Resource store endpoint and id scoping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub host: String,
    pub base_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            base_path: String::new(),
        }
    }
}

impl StoreConfig {
    /// Builds a validated, normalized config.
    pub fn new(host: &str, base_path: &str) -> Result<Self, ConfigError> {
        Self {
            host: host.to_string(),
            base_path: base_path.to_string(),
        }
        .normalized()
    }

    /// Loads defaults, then `path` when given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config
            .with_overrides(|key| std::env::var(key).ok())
            .normalized()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.normalized()
    }

    /// Applies `FEDORA_LENS_HOST` / `FEDORA_LENS_BASE_PATH` through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host;
        }
        if let Some(base_path) = lookup(BASE_PATH_ENV) {
            self.base_path = base_path;
        }
        self
    }

    fn normalized(self) -> Result<Self, ConfigError> {
        let host = self.host.trim().trim_end_matches('/').to_string();
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "host must be an http(s) URL, got `{host}`"
            )));
        }

        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "base_path must not contain whitespace, got `{trimmed}`"
            )));
        }
        let base_path = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };

        Ok(Self { host, base_path })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, BASE_PATH_ENV, DEFAULT_HOST, HOST_ENV};
    use std::io::Write;

    #[test]
    fn new_normalizes_host_and_base_path() {
        let config = StoreConfig::new(" http://h:8080/rest/ ", "texts/").unwrap();
        assert_eq!(config.host, "http://h:8080/rest");
        assert_eq!(config.base_path, "/texts");

        let root = StoreConfig::new("http://h", "/").unwrap();
        assert_eq!(root.base_path, "");
    }

    #[test]
    fn rejects_non_http_host_and_spaced_base_path() {
        assert!(matches!(
            StoreConfig::new("localhost:8983", ""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            StoreConfig::new("http://h", "/a b"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = StoreConfig::from_toml_str("base_path = \"/test\"").unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.base_path, "/test");

        assert!(matches!(
            StoreConfig::from_toml_str("host = 5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"http://file-host\"\nbase_path = \"/file\"").unwrap();

        let from_file = StoreConfig::from_file(file.path()).unwrap();
        let overridden = from_file
            .with_overrides(|key| match key {
                HOST_ENV => Some("http://env-host/".to_string()),
                BASE_PATH_ENV => None,
                _ => None,
            })
            .normalized()
            .unwrap();
        assert_eq!(overridden.host, "http://env-host");
        assert_eq!(overridden.base_path, "/file");
    }
}
