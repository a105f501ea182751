use strata_common::network::target::Target;
use strata_common::result::{BenchmarkResult, TargetResult};
use tracing::{debug, info};

use crate::scheduler::{Scheduler, TargetRunner};

/// Runs the full pipeline `iterations` times, one run after another.
pub async fn benchmark(runner: &dyn TargetRunner, target: &Target, iterations: usize) -> BenchmarkResult {
    info!("Running benchmark for {target} ({iterations} iterations)");

    let mut results = Vec::with_capacity(iterations);
    for iteration in 1..=iterations {
        debug!("Benchmark iteration {iteration}/{iterations}");
        results.push(runner.run_target(target).await);
    }

    BenchmarkResult::new(target.clone(), results)
}

/// Side-by-side run of several targets. Purely the scheduler's output.
pub async fn compare(scheduler: &Scheduler, targets: &[Target]) -> Vec<TargetResult> {
    info!("Comparing {} targets", targets.len());
    scheduler.run(targets).await
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
