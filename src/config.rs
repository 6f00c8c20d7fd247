//! Sidecar configuration, read once from the environment at startup.

use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "classboardd=info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Workspace to open before the first request, if any.
    pub workspace: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive string.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let workspace = match get("CLASSBOARD_WORKSPACE") {
            Some(v) if v.trim().is_empty() => {
                return Err(ConfigError::Invalid("CLASSBOARD_WORKSPACE", v))
            }
            Some(v) => Some(PathBuf::from(v)),
            None => None,
        };
        let log_filter = get("CLASSBOARD_LOG")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            workspace,
            log_filter,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
