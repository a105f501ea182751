use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CHECKS: [&str; 4] = ["dns", "tcp", "tls", "http"];

/// Engine options, supplied fully formed by whatever front end drives the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordered check names to run for every target.
    pub checks: Vec<String>,
    /// Per-attempt timeout in seconds.
    pub timeout: f64,
    /// Attempts per check, at least one.
    pub retries: u32,
    /// Prefer an IPv6 address as the primary resolution result.
    pub prefer_ipv6: bool,
    /// Certificate inspection, security headers and protocol probing.
    pub deep_analysis: bool,
    /// Probe ALPN for HTTP/2 support even outside deep analysis.
    pub check_alpn: bool,
    /// Record redirect targets in the application check.
    pub follow_redirects: bool,
    /// Maximum number of targets in flight.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checks: DEFAULT_CHECKS.iter().map(|c| c.to_string()).collect(),
            timeout: 10.0,
            retries: 1,
            prefer_ipv6: false,
            deep_analysis: false,
            check_alpn: false,
            follow_redirects: true,
            workers: 10,
        }
    }
}

impl Config {
    /// Loads a JSON config file. Missing keys keep their defaults, unknown keys are ignored.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Invalid {
            field: "config",
            reason: e.to_string(),
        })?;
        fs::write(path, json).map_err(write_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "timeout",
                reason: format!("must be a positive number of seconds, got {}", self.timeout),
            });
        }
        if self.retries == 0 {
            return Err(ConfigError::Invalid {
                field: "retries",
                reason: "at least one attempt is required".to_string(),
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                field: "workers",
                reason: "at least one worker is required".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout).unwrap_or(Duration::from_secs(10))
    }

    pub fn attempts(&self) -> u32 {
        self.retries.max(1)
    }

    pub fn worker_limit(&self) -> usize {
        self.workers.max(1)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
