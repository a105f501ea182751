use std::time::{Duration, Instant};

use colored::*;
use strata_common::config::Config;
use strata_common::network::target::Target;
use strata_common::result::TargetResult;
use strata_core::Engine;

use crate::commands::Format;
use crate::report;
use crate::sprint;
use crate::terminal::{colors, format, print, spinner};

type Detail = (String, ColoredString);

pub async fn check(engine: &Engine, targets: &[Target], output: Format) -> anyhow::Result<u8> {
    let spinner = spinner::start(format!("Checking {} target(s)...", targets.len()));
    let start_time: Instant = Instant::now();
    let results: Vec<TargetResult> = engine.check_targets(targets).await;
    drop(spinner);

    match output {
        Format::Json => println!("{}", report::to_json(&results)?),
        Format::Terminal => print_results(&results, start_time.elapsed(), engine.config()),
    }

    Ok(report::results_exit_code(&results))
}

fn print_results(results: &[TargetResult], total_time: Duration, cfg: &Config) {
    print::banner();
    if results.is_empty() {
        print::no_results();
        return;
    }

    print::header("Diagnostics");
    for (idx, result) in results.iter().enumerate() {
        print_target_tree(result, idx, cfg);
        if idx + 1 != results.len() {
            sprint!();
        }
    }
    print_summary(results, total_time);
}

pub fn print_target_tree(result: &TargetResult, idx: usize, cfg: &Config) {
    let head = format!(
        "{} {}",
        result.target.raw(),
        format!("({})", format::duration(result.total_duration_ms)).color(colors::MUTED)
    );
    print::tree_head(idx, &head);

    let mut details: Vec<Detail> = Vec::with_capacity(result.checks.len());
    for check in &result.checks {
        details.push(format::check_to_detail(check));
        if cfg.deep_analysis {
            details.extend(
                format::metadata_to_details(check)
                    .into_iter()
                    .map(|(key, value)| (format!("  {key}"), value)),
            );
        }
    }
    print::as_tree_one_level(details);
}

fn print_summary(results: &[TargetResult], total_time: Duration) {
    let healthy = results.iter().filter(|r| r.is_healthy()).count();
    let failed = results.iter().filter(|r| r.has_failures()).count();
    let degraded = results.len() - healthy - failed;

    let healthy: ColoredString = format!("{healthy} healthy").bold().color(colors::SUCCESS);
    let degraded: ColoredString = format!("{degraded} degraded").bold().color(colors::WARNING);
    let failed: ColoredString = format!("{failed} failing").bold().color(colors::FAILURE);
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();

    print::fat_separator();
    print::centerln(&format!("{healthy} • {degraded} • {failed} in {total_time}"));
}
