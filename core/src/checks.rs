//! The central **abstraction** for a single diagnostic layer.
//!
//! Every layer (resolution, transport, handshake, application request) implements
//! [`Check`]: given a target and the shared configuration it produces exactly one
//! [`CheckResult`]. Faults are folded into a FAILURE result at this boundary and
//! never propagate to the caller.
//!
//! **Architectural Note:**
//! The pipeline depends on this trait and on the [`CheckRegistry`], never on the
//! concrete submodules. Tests swap in their own implementations through the registry.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use strata_common::config::Config;
use strata_common::network::target::Target;
use strata_common::result::CheckResult;

mod dns;
mod http;
mod tcp;
mod tls;

pub use dns::DnsCheck;
pub use http::HttpCheck;
pub use tcp::TcpCheck;
pub use tls::TlsCheck;

/// The closed set of layers the engine knows how to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckKind {
    Dns,
    Tcp,
    Tls,
    Http,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [CheckKind::Dns, CheckKind::Tcp, CheckKind::Tls, CheckKind::Http];

    /// Maps a configured check name (`dns`, `tcp`, `tls`, `http`) to its kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dns" => Some(CheckKind::Dns),
            "tcp" => Some(CheckKind::Tcp),
            "tls" => Some(CheckKind::Tls),
            "http" => Some(CheckKind::Http),
            _ => None,
        }
    }

    /// Name recorded in results.
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::Dns => "DNS",
            CheckKind::Tcp => "TCP",
            CheckKind::Tls => "TLS",
            CheckKind::Http => "HTTP",
        }
    }

    /// A failure of a critical layer makes every later layer meaningless.
    pub fn is_critical(&self) -> bool {
        matches!(self, CheckKind::Dns | CheckKind::Tcp)
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[async_trait]
pub trait Check: Send + Sync {
    fn kind(&self) -> CheckKind;

    /// Runs the probe once. Must not panic and must not return early with an error:
    /// every fault becomes a FAILURE result.
    async fn run(&self, target: &Target, config: &Config) -> CheckResult;
}

/// Maps each [`CheckKind`] to the implementation that runs it.
#[derive(Clone, Default)]
pub struct CheckRegistry {
    checks: HashMap<CheckKind, Arc<dyn Check>>,
}

impl CheckRegistry {
    /// Registry backed by the real network checks.
    pub fn standard() -> Self {
        Self::default()
            .with(Arc::new(DnsCheck))
            .with(Arc::new(TcpCheck))
            .with(Arc::new(TlsCheck))
            .with(Arc::new(HttpCheck))
    }

    /// Registers `check` under its own kind, replacing any previous entry.
    pub fn with(mut self, check: Arc<dyn Check>) -> Self {
        self.register(check);
        self
    }

    pub fn register(&mut self, check: Arc<dyn Check>) {
        self.checks.insert(check.kind(), check);
    }

    pub fn get(&self, kind: CheckKind) -> Option<Arc<dyn Check>> {
        self.checks.get(&kind).cloned()
    }
}

/// Flattens an error and its sources into one line.
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
