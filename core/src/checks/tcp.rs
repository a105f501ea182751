use std::fmt;
use std::io::ErrorKind;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use strata_common::config::Config;
use strata_common::error::CheckError;
use strata_common::network::target::Target;
use strata_common::result::CheckResult;
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::{Check, CheckKind};

const FAST_THRESHOLD: Duration = Duration::from_millis(50);
const GOOD_THRESHOLD: Duration = Duration::from_millis(150);

/// Coarse connect latency classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyTier {
    Fast,
    Good,
    Slow,
}

impl LatencyTier {
    pub fn classify(elapsed: Duration) -> Self {
        if elapsed < FAST_THRESHOLD {
            LatencyTier::Fast
        } else if elapsed < GOOD_THRESHOLD {
            LatencyTier::Good
        } else {
            LatencyTier::Slow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LatencyTier::Fast => "fast",
            LatencyTier::Good => "good",
            LatencyTier::Slow => "slow",
        }
    }
}

impl fmt::Display for LatencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opens a TCP connection and closes it straight away.
pub struct TcpCheck;

#[async_trait]
impl Check for TcpCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Tcp
    }

    async fn run(&self, target: &Target, config: &Config) -> CheckResult {
        let start = Instant::now();
        let connected = connect(target.host(), target.port(), config.timeout_duration()).await;
        let elapsed = start.elapsed();

        match connected {
            Ok(()) => {
                let quality = LatencyTier::classify(elapsed);
                CheckResult::success(CheckKind::Tcp.label(), elapsed, format!("Connected ({quality})"))
                    .with_metadata("host", target.host())
                    .with_metadata("port", target.port())
                    .with_metadata("quality", quality.as_str())
            }
            Err(e) => CheckResult::failure(CheckKind::Tcp.label(), elapsed, e.summary(), e.to_string()),
        }
    }
}

async fn connect(host: &str, port: u16, limit: Duration) -> Result<(), CheckError> {
    let stream = timeout(limit, TcpStream::connect((host, port)))
        .await
        .map_err(|_| CheckError::ConnectTimeout(limit))?
        .map_err(|e| match e.kind() {
            ErrorKind::ConnectionRefused => CheckError::ConnectRefused,
            _ => CheckError::Connect(e),
        })?;
    drop(stream);
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
