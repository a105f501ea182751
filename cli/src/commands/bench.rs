use colored::*;
use strata_common::network::target::Target;
use strata_common::result::BenchmarkResult;
use strata_core::Engine;

use crate::commands::Format;
use crate::report;
use crate::terminal::{colors, format, print, spinner};

const STAT_KEYS: usize = 12;

pub async fn bench(engine: &Engine, target: &Target, iterations: usize, output: Format) -> anyhow::Result<u8> {
    let spinner = spinner::start(format!("Benchmarking {target} ({iterations} iterations)..."));
    let result: BenchmarkResult = engine.benchmark(target, iterations).await;
    drop(spinner);

    match output {
        Format::Json => println!("{}", report::to_json(&result)?),
        Format::Terminal => print_benchmark(&result),
    }

    Ok(report::benchmark_exit_code(&result))
}

/// Mean duration of each named check across the runs that reached it.
fn per_check_averages(result: &BenchmarkResult) -> Vec<(String, f64)> {
    let mut averages: Vec<(String, f64, usize)> = Vec::new();
    for check in result.results.iter().flat_map(|run| run.checks.iter()).filter(|c| !c.is_skipped()) {
        match averages.iter_mut().find(|(name, _, _)| *name == check.name) {
            Some((_, sum, count)) => {
                *sum += check.duration_ms;
                *count += 1;
            }
            None => averages.push((check.name.clone(), check.duration_ms, 1)),
        }
    }
    averages
        .into_iter()
        .map(|(name, sum, count)| (name, sum / count as f64))
        .collect()
}

fn print_benchmark(result: &BenchmarkResult) {
    print::banner();
    print::header(&format!("Benchmark {}", result.target.raw()));

    if result.iterations == 0 {
        print::no_results();
        return;
    }

    let rate = result.success_rate();
    let rate_color = match report::benchmark_exit_code(result) {
        report::EXIT_HEALTHY => colors::SUCCESS,
        report::EXIT_WARNINGS => colors::WARNING,
        _ => colors::FAILURE,
    };

    print::aligned_line("Iterations", STAT_KEYS, result.iterations.to_string());
    print::aligned_line("Average", STAT_KEYS, format::duration(result.avg_duration_ms()));
    print::aligned_line("Fastest", STAT_KEYS, format::duration(result.min_duration_ms()));
    print::aligned_line("Slowest", STAT_KEYS, format::duration(result.max_duration_ms()));
    print::aligned_line(
        "Success rate",
        STAT_KEYS,
        format!("{rate:.1}% ({}/{})", result.healthy_iterations(), result.iterations)
            .bold()
            .color(rate_color),
    );

    let averages = per_check_averages(result);
    if !averages.is_empty() {
        print::header("Per check average");
        for (name, avg) in averages {
            print::aligned_line(&name, STAT_KEYS, format::duration(avg));
        }
    }

    print::end_of_program();
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::time::Duration;
    use strata_common::result::{CheckResult, Status, TargetResult};

    fn run(dns_ms: u64, tcp_ms: Option<u64>) -> TargetResult {
        let mut checks = vec![CheckResult::success("DNS", Duration::from_millis(dns_ms), "")];
        if let Some(ms) = tcp_ms {
            checks.push(CheckResult::success("TCP", Duration::from_millis(ms), ""));
        }
        checks.push(CheckResult::skipped("TLS", "Skipped (non-TLS target)"));
        TargetResult::new(Target::from_str("good-host:80").unwrap(), checks)
    }

    #[test]
    fn averages_only_count_runs_that_reached_the_check() {
        let result = BenchmarkResult::new(
            Target::from_str("good-host:80").unwrap(),
            vec![run(10, Some(30)), run(20, None), run(30, Some(50))],
        );

        let averages = per_check_averages(&result);

        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].0, "DNS");
        assert!((averages[0].1 - 20.0).abs() < 1e-9);
        assert_eq!(averages[1].0, "TCP");
        assert!((averages[1].1 - 40.0).abs() < 1e-9);
        assert!(result.results.iter().all(|r| r.checks.iter().any(|c| c.status == Status::Skipped)));
    }
}
