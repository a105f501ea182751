//! Ordered execution of the configured checks for one target.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use strata_common::config::Config;
use strata_common::network::target::Target;
use strata_common::result::{CheckResult, TargetResult};
use tracing::{debug, warn};

use crate::checks::{Check, CheckKind, CheckRegistry};
use crate::retry::RetryPolicy;
use crate::scheduler::TargetRunner;

const SKIPPED_PLAIN: &str = "Skipped (non-TLS target)";

pub struct Pipeline {
    config: Arc<Config>,
    steps: Vec<(CheckKind, Arc<dyn Check>)>,
    retry: RetryPolicy,
}

impl Pipeline {
    /// Resolves the configured check names against `registry`.
    ///
    /// Names that are unknown, or known but not registered, are dropped here
    /// with a warning and never reported at run time.
    pub fn new(config: Arc<Config>, registry: &CheckRegistry) -> Self {
        let mut steps = Vec::with_capacity(config.checks.len());
        for name in &config.checks {
            match CheckKind::from_name(name).and_then(|kind| registry.get(kind).map(|check| (kind, check))) {
                Some(step) => steps.push(step),
                None => warn!("Unknown check: {name}"),
            }
        }

        Self {
            retry: RetryPolicy::from_config(&config),
            config,
            steps,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Kinds that will run, in order.
    pub fn steps(&self) -> Vec<CheckKind> {
        self.steps.iter().map(|(kind, _)| *kind).collect()
    }

    pub async fn run(&self, target: &Target) -> TargetResult {
        let start = Instant::now();
        debug!(addr = %target, "checking target");

        let mut checks: Vec<CheckResult> = Vec::with_capacity(self.steps.len());
        for (kind, check) in &self.steps {
            if *kind == CheckKind::Tls && !target.uses_secure_transport() {
                checks.push(CheckResult::skipped(kind.label(), SKIPPED_PLAIN));
                continue;
            }

            let result = self.retry.run(check.as_ref(), target, &self.config).await;
            debug!(addr = %target, check = kind.label(), status = %result.status, "check finished");

            let halt = result.is_failure() && kind.is_critical();
            checks.push(result);
            if halt {
                debug!(addr = %target, check = kind.label(), "critical check failed, stopping early");
                break;
            }
        }

        TargetResult::new(target.clone(), checks).with_total_duration(start.elapsed())
    }
}

#[async_trait]
impl TargetRunner for Pipeline {
    async fn run_target(&self, target: &Target) -> TargetResult {
        self.run(target).await
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
