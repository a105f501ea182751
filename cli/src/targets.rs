use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use strata_common::network::target::Target;
use strata_core::Engine;

/// Collects targets from the command line, then from `file` when given.
pub fn load(args: &[String], file: Option<&Path>) -> anyhow::Result<Vec<Target>> {
    let mut raw: Vec<String> = args.to_vec();
    if let Some(path) = file {
        let text = fs::read_to_string(path).with_context(|| format!("File not found: {}", path.display()))?;
        raw.extend(parse_list(&text));
    }

    if raw.is_empty() {
        bail!("No targets specified");
    }

    Ok(Engine::parse_targets(&raw)?)
}

/// One target per line. Blank lines and lines starting with `#` are ignored.
fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
