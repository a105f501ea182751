use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use strata_common::config::Config;
use strata_common::network::target::Target;
use strata_common::result::CheckResult;
use tokio::time::sleep;
use tracing::debug;

use crate::checks::Check;

const BASE_BACKOFF: Duration = Duration::from_millis(500);

/// Bounded attempts with linear backoff.
///
/// Attempt `n` (counting from 1) that does not succeed is followed by a pause of
/// `0.5s * n` before attempt `n + 1`. There is no pause after the last attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
}

impl RetryPolicy {
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.attempts())
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        BASE_BACKOFF * attempt
    }

    /// Runs `check` until it succeeds or the attempts run out.
    ///
    /// The last result obtained is returned unchanged. A panic inside the check
    /// counts as a failed attempt.
    pub async fn run(&self, check: &dyn Check, target: &Target, config: &Config) -> CheckResult {
        let label = check.kind().label();
        let mut attempt = 1;
        loop {
            let result = match AssertUnwindSafe(check.run(target, config)).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    debug!(check = label, attempt, "check panicked: {message}");
                    CheckResult::failure(label, Duration::ZERO, "Check crashed", message)
                }
            };

            if result.is_success() || attempt >= self.attempts {
                return result;
            }

            debug!(
                check = label,
                attempt,
                status = %result.status,
                error = result.error.as_deref().unwrap_or(""),
                "attempt did not succeed, backing off"
            );
            sleep(self.backoff(attempt)).await;
            attempt += 1;
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "check panicked".to_string()
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
