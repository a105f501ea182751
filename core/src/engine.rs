//! The one entry point front ends talk to.
//!
//! An [`Engine`] is built once from a fully formed [`Config`] and then reused
//! for any number of single, batch, benchmark or compare runs. It returns plain
//! result data; rendering and exit codes are the caller's business.

use std::str::FromStr;
use std::sync::Arc;

use strata_common::config::Config;
use strata_common::error::TargetError;
use strata_common::network::target::Target;
use strata_common::result::{BenchmarkResult, TargetResult};

use crate::benchmark;
use crate::checks::CheckRegistry;
use crate::pipeline::Pipeline;
use crate::scheduler::Scheduler;

pub struct Engine {
    pipeline: Arc<Pipeline>,
    scheduler: Scheduler,
}

impl Engine {
    /// Engine backed by the real network checks.
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, CheckRegistry::standard())
    }

    pub fn with_registry(config: Config, registry: CheckRegistry) -> Self {
        let workers = config.worker_limit();
        let pipeline = Arc::new(Pipeline::new(Arc::new(config), &registry));
        let scheduler = Scheduler::new(pipeline.clone(), workers);
        Self { pipeline, scheduler }
    }

    pub fn config(&self) -> &Config {
        self.pipeline.config()
    }

    /// Parses raw operator input, stopping at the first invalid entry.
    pub fn parse_targets<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<Target>, TargetError> {
        inputs.iter().map(|raw| Target::from_str(raw.as_ref())).collect()
    }

    pub async fn check_target(&self, target: &Target) -> TargetResult {
        self.pipeline.run(target).await
    }

    pub async fn check_targets(&self, targets: &[Target]) -> Vec<TargetResult> {
        self.scheduler.run(targets).await
    }

    pub async fn benchmark(&self, target: &Target, iterations: usize) -> BenchmarkResult {
        benchmark::benchmark(self.pipeline.as_ref(), target, iterations).await
    }

    pub async fn compare(&self, targets: &[Target]) -> Vec<TargetResult> {
        benchmark::compare(&self.scheduler, targets).await
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
