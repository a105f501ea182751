//! Machine-readable output and process exit codes.

use serde::Serialize;
use strata_common::result::{BenchmarkResult, TargetResult};

pub const EXIT_HEALTHY: u8 = 0;
pub const EXIT_WARNINGS: u8 = 1;
pub const EXIT_FAILURES: u8 = 2;
pub const EXIT_INTERRUPTED: u8 = 130;

/// Benchmarks below this success rate count as failed.
const FAILING_RATE: f64 = 50.0;
/// Benchmarks below this success rate count as degraded.
const DEGRADED_RATE: f64 = 90.0;

/// Worst outcome across all targets: any failure beats any warning.
pub fn results_exit_code(results: &[TargetResult]) -> u8 {
    if results.iter().any(TargetResult::has_failures) {
        EXIT_FAILURES
    } else if results.iter().any(TargetResult::has_warnings) {
        EXIT_WARNINGS
    } else {
        EXIT_HEALTHY
    }
}

pub fn benchmark_exit_code(benchmark: &BenchmarkResult) -> u8 {
    let rate = benchmark.success_rate();
    if rate < FAILING_RATE {
        EXIT_FAILURES
    } else if rate < DEGRADED_RATE {
        EXIT_WARNINGS
    } else {
        EXIT_HEALTHY
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
