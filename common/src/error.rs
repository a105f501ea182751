use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures while turning raw operator input into a [`Target`](crate::network::target::Target).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("target is empty")]
    Empty,
    #[error("target '{0}' has no host")]
    MissingHost(String),
    #[error("invalid port '{port}' in target '{input}'")]
    InvalidPort { input: String, port: String },
    #[error("invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },
}

/// Layer faults raised inside a single check.
///
/// These never cross the check boundary: every check folds them into a
/// FAILURE result, using [`CheckError::summary`] as the human summary and the
/// `Display` text as the diagnostic.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("DNS error: {0}")]
    Resolution(#[source] std::io::Error),
    #[error("Empty DNS response for {0}")]
    NoAddresses(String),
    #[error("DNS lookup timed out after {}s", .0.as_secs_f64())]
    ResolutionTimeout(Duration),

    #[error("Timeout after {}s", .0.as_secs_f64())]
    ConnectTimeout(Duration),
    #[error("Port closed or service not running")]
    ConnectRefused,
    #[error("{0}")]
    Connect(#[source] std::io::Error),

    #[error("TLS handshake timed out after {}s", .0.as_secs_f64())]
    HandshakeTimeout(Duration),
    #[error("'{0}' is not a valid TLS server name")]
    InvalidServerName(String),
    #[error("SSL error: {0}")]
    Handshake(String),

    #[error("HTTP request timed out after {}s", .0.as_secs_f64())]
    RequestTimeout(Duration),
    #[error("{0}")]
    Request(String),
}

impl CheckError {
    /// Short, layer-specific summary used as the result `details`.
    pub fn summary(&self) -> &'static str {
        match self {
            CheckError::Resolution(_) | CheckError::ResolutionTimeout(_) => "DNS resolution failed",
            CheckError::NoAddresses(_) => "No DNS records found",
            CheckError::ConnectTimeout(_) => "Connection timeout",
            CheckError::ConnectRefused => "Connection refused",
            CheckError::Connect(_) => "Connection failed",
            CheckError::HandshakeTimeout(_)
            | CheckError::InvalidServerName(_)
            | CheckError::Handshake(_) => "TLS handshake failed",
            CheckError::RequestTimeout(_) | CheckError::Request(_) => "HTTP request failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
