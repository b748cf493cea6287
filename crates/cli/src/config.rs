//! CLI configuration: `querydesk.toml`, then environment overrides, then
//! validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File read when `--config` is not given. Missing is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "querydesk.toml";

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Root of `querydesk.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub client: ClientSettings,
    pub backend: BackendSettings,
    pub logging: LogSettings,
}

/// Where the client pipeline sends requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
        }
    }
}

/// How `querydesk serve` binds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub listen_addr: String,
    /// Origin admitted by the CORS policy.
    pub frontend_origin: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3001".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// An `EnvFilter` directive such as `info` or `middleware=debug,warn`.
    pub level: String,
    pub json: bool,
    /// OTLP gRPC collector; span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
            otlp_endpoint: None,
        }
    }
}

impl CliConfig {
    /// Loads `path`, or [`DEFAULT_CONFIG_FILE`] if present, or the defaults.
    ///
    /// An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parses a TOML file. Absent keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `QUERYDESK_*` environment variables.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    ///
    /// A `QUERYDESK_LOG_JSON` value other than `true`/`false`/`1`/`0` is
    /// ignored.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("QUERYDESK_BASE_URL") {
            self.client.base_url = url;
        }
        if let Some(addr) = lookup("QUERYDESK_LISTEN_ADDR") {
            self.backend.listen_addr = addr;
        }
        if let Some(origin) = lookup("QUERYDESK_FRONTEND_ORIGIN") {
            self.backend.frontend_origin = origin;
        }
        if let Some(level) = lookup("QUERYDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("QUERYDESK_LOG_JSON") {
            match json.as_str() {
                "true" | "1" => self.logging.json = true,
                "false" | "0" => self.logging.json = false,
                _ => {}
            }
        }
        if let Some(endpoint) = lookup("QUERYDESK_OTLP_ENDPOINT") {
            self.logging.otlp_endpoint = Some(endpoint).filter(|e| !e.is_empty());
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_http("client.base_url", &self.client.base_url)?;
        require_http("backend.frontend_origin", &self.backend.frontend_origin)?;

        if self.backend.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Invalid {
                field: "backend.listen_addr",
                reason: format!("'{}' is not a socket address", self.backend.listen_addr),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "logging.level",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(endpoint) = &self.logging.otlp_endpoint {
            require_http("logging.otlp_endpoint", endpoint)?;
        }
        Ok(())
    }
}

fn require_http(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("'{value}' must start with http:// or https://"),
        })
    }
}
