use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::MonitorTarget;
use crate::error::AgentError;

/// Process configuration, read from `HOSTPULSE_*` environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub config_path: PathBuf,
    pub state_path: PathBuf,
    pub interval: u64,
    pub proc_path: PathBuf,
    pub http_timeout: u64,
    pub docker_socket: Option<String>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            config_path: env::var("HOSTPULSE_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/sm/config.json")),
            state_path: env::var("HOSTPULSE_STATE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/sm/state.json")),
            interval: positive_secs(env::var("HOSTPULSE_INTERVAL").ok(), 60),
            proc_path: env::var("HOSTPULSE_PROC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/proc")),
            http_timeout: positive_secs(env::var("HOSTPULSE_HTTP_TIMEOUT").ok(), 30),
            docker_socket: env::var("HOSTPULSE_DOCKER_SOCKET").ok(),
            log_level: env::var("HOSTPULSE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }
}

/// A whole number of seconds above zero, else `default`
fn positive_secs(value: Option<String>, default: u64) -> u64 {
    value
        .and_then(|s| s.trim().parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// The agent file: where to report and what to monitor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub backend: String,
    #[serde(default)]
    pub project_token: Option<String>,
    #[serde(default)]
    pub monitor: Vec<MonitorTarget>,
}

impl AgentConfig {
    /// Parse a JSON agent file, or TOML when the extension says so
    pub fn load(path: &Path) -> Result<Self, AgentError> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        if config.backend.trim().is_empty() {
            return Err(AgentError::Config("`backend` must not be empty".to_string()));
        }

        Ok(config)
    }
}
