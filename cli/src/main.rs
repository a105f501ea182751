mod commands;
mod report;
mod targets;
mod terminal;

use std::process::ExitCode;

use anyhow::Context;
use commands::{CommandLine, Format, Mode, bench, check, compare};
use strata_common::config::Config;
use strata_common::network::target::Target;
use strata_core::Engine;
use terminal::print;
use tracing::{error, warn};

/// Floor for the blocking pool that runs resolver calls.
const MIN_BLOCKING_THREADS: usize = 16;

fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    terminal::init(commands.verbose, commands.no_color);

    match run(commands) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(report::EXIT_FAILURES)
        }
    }
}

fn run(commands: CommandLine) -> anyhow::Result<u8> {
    let base = match &commands.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let config = commands.apply(base);
    config.validate()?;

    if let Some(path) = &commands.save_config {
        config.save(path)?;
        print::print_status(format!("Configuration saved to {}", path.display()));
        return Ok(report::EXIT_HEALTHY);
    }

    let targets = targets::load(&commands.targets, commands.file.as_deref())?;
    let mode = commands.mode(targets.len());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(config.worker_limit().max(MIN_BLOCKING_THREADS))
        .build()
        .context("failed to start the async runtime")?;

    let engine = Engine::new(config);
    let outcome = runtime.block_on(async {
        tokio::select! {
            code = dispatch(&engine, &targets, mode, commands.format) => code,
            Ok(()) = tokio::signal::ctrl_c() => {
                warn!("Interrupted by user");
                Ok(report::EXIT_INTERRUPTED)
            }
        }
    });
    runtime.shutdown_background();
    outcome
}

async fn dispatch(engine: &Engine, targets: &[Target], mode: Mode, output: Format) -> anyhow::Result<u8> {
    match mode {
        Mode::Check => check::check(engine, targets, output).await,
        Mode::Compare => compare::compare(engine, targets, output).await,
        Mode::Benchmark(iterations) => match targets.first() {
            Some(target) => bench::bench(engine, target, iterations, output).await,
            None => anyhow::bail!("No targets specified"),
        },
    }
}
