use colored::*;
use strata_common::result::{CheckResult, MetaValue, Status};

use crate::terminal::colors;

type Detail = (String, ColoredString);

/// Metadata keys shown under a check when deep analysis is on.
const DEEP_KEYS: [&str; 9] = [
    "ips",
    "cipher_strength",
    "cert_subject",
    "cert_issuer",
    "cert_days_until_expiry",
    "server",
    "content_type",
    "security_headers",
    "response_size",
];

pub fn status_color(status: Status) -> Color {
    match status {
        Status::Success => colors::SUCCESS,
        Status::Warning => colors::WARNING,
        Status::Failure => colors::FAILURE,
        Status::Skipped => colors::SKIPPED,
    }
}

pub fn status_symbol(status: Status) -> ColoredString {
    let symbol = match status {
        Status::Success => "✓",
        Status::Warning => "⚠",
        Status::Failure => "✗",
        Status::Skipped => "○",
    };
    symbol.color(status_color(status)).bold()
}

/// Milliseconds under a second, seconds with two decimals above.
pub fn duration(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{ms:.0}ms")
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

/// One check as a tree entry: symbol, details, duration and any diagnostic.
pub fn check_to_detail(check: &CheckResult) -> Detail {
    let mut value = format!("{} {}", status_symbol(check.status), check.details.color(colors::TEXT_DEFAULT));
    if !check.is_skipped() {
        value.push_str(&format!(" {}", duration(check.duration_ms).color(colors::MUTED)));
    }
    if let Some(error) = check.error.as_deref().filter(|_| !check.is_success()) {
        value.push_str(&format!(" {}", format!("({error})").color(status_color(check.status))));
    }
    (check.name.clone(), value.normal())
}

/// Extra facts worth showing for one check.
pub fn metadata_to_details(check: &CheckResult) -> Vec<Detail> {
    DEEP_KEYS
        .iter()
        .filter_map(|key| check.metadata.get(*key).map(|value| (key, value)))
        .filter(|(_, value)| !matches!(value, MetaValue::List(items) if items.is_empty()))
        .map(|(key, value)| (key.replace('_', " "), value.to_string().color(colors::MUTED)))
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
