use colored::*;
use strata_common::network::target::Target;
use strata_common::result::{Status, TargetResult};
use strata_core::Engine;

use crate::commands::Format;
use crate::report;
use crate::terminal::{colors, format, print, spinner};

pub async fn compare(engine: &Engine, targets: &[Target], output: Format) -> anyhow::Result<u8> {
    let spinner = spinner::start(format!("Comparing {} targets...", targets.len()));
    let results: Vec<TargetResult> = engine.compare(targets).await;
    drop(spinner);

    match output {
        Format::Json => println!("{}", report::to_json(&results)?),
        Format::Terminal => print_comparison(&results),
    }

    Ok(report::results_exit_code(&results))
}

/// Index of the quickest target that came back healthy.
fn fastest_healthy(results: &[TargetResult]) -> Option<usize> {
    results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_healthy())
        .min_by(|(_, a), (_, b)| a.total_duration_ms.total_cmp(&b.total_duration_ms))
        .map(|(idx, _)| idx)
}

fn print_comparison(results: &[TargetResult]) {
    print::banner();
    print::header("Comparison");

    let key_width = results.iter().map(|r| r.target.raw().chars().count()).max().unwrap_or(0);
    let fastest = fastest_healthy(results);

    for (idx, result) in results.iter().enumerate() {
        let worst = result.worst_status().unwrap_or(Status::Skipped);
        let layers: String = result
            .checks
            .iter()
            .map(|c| format!("{}{}", format::status_symbol(c.status), c.name.color(colors::MUTED)))
            .collect::<Vec<String>>()
            .join(" ");
        let mut value = format!(
            "{} {} {}",
            format::status_symbol(worst),
            format::duration(result.total_duration_ms).color(format::status_color(worst)),
            layers
        );
        if fastest == Some(idx) {
            value.push_str(&format!(" {}", "fastest".bold().color(colors::ACCENT)));
        }
        print::aligned_line(result.target.raw(), key_width, value);
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
