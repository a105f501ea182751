//! # Diagnostic Results
//!
//! Plain data produced by the engine: one [`CheckResult`] per layer, rolled up
//! into a [`TargetResult`] per target and a [`BenchmarkResult`] for repeated runs.
//! Renderers consume these types and nothing else.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::network::target::Target;

/// Outcome of a single check.
///
/// The derived ordering is the severity used for "worst status wins" rollups:
/// `Skipped < Success < Warning < Failure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Skipped,
    Success,
    Warning,
    Failure,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Skipped => "skipped",
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Failure => "failure",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single layer-specific fact attached to a check result.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MetaValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetaValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Text(s) => f.write_str(s),
            MetaValue::Integer(n) => write!(f, "{n}"),
            MetaValue::Number(n) => write!(f, "{n:.2}"),
            MetaValue::Flag(b) => write!(f, "{b}"),
            MetaValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Text(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Integer(value)
    }
}

impl From<u16> for MetaValue {
    fn from(value: u16) -> Self {
        MetaValue::Integer(i64::from(value))
    }
}

impl From<usize> for MetaValue {
    fn from(value: usize) -> Self {
        MetaValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Number(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Flag(value)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(value: Vec<String>) -> Self {
        MetaValue::List(value)
    }
}

pub type Metadata = BTreeMap<String, MetaValue>;

pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// One check's outcome.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CheckResult {
    pub name: String,
    pub duration_ms: f64,
    pub status: Status,
    pub details: String,
    pub error: Option<String>,
    pub metadata: Metadata,
    pub timestamp: DateTime<Local>,
}

impl CheckResult {
    pub fn new(
        name: impl Into<String>,
        status: Status,
        duration: Duration,
        details: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            duration_ms: duration_ms(duration),
            status,
            details: details.into(),
            error: None,
            metadata: Metadata::new(),
            timestamp: Local::now(),
        }
    }

    pub fn success(name: impl Into<String>, duration: Duration, details: impl Into<String>) -> Self {
        Self::new(name, Status::Success, duration, details)
    }

    pub fn failure(
        name: impl Into<String>,
        duration: Duration,
        details: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self::new(name, Status::Failure, duration, details).with_error(error)
    }

    /// A check that never ran. Zero duration and no diagnostic.
    pub fn skipped(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(name, Status::Skipped, Duration::ZERO, details)
    }

    /// Attaches a diagnostic. Ignored for skipped checks.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        if self.status != Status::Skipped {
            self.error = Some(error.into());
        }
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_warning(&self) -> bool {
        self.status == Status::Warning
    }

    pub fn is_failure(&self) -> bool {
        self.status == Status::Failure
    }

    pub fn is_skipped(&self) -> bool {
        self.status == Status::Skipped
    }
}

/// A target's full pipeline outcome, checks in configured order.
#[derive(Debug, Clone)]
pub struct TargetResult {
    pub target: Target,
    pub checks: Vec<CheckResult>,
    pub total_duration_ms: f64,
    pub timestamp: DateTime<Local>,
}

impl TargetResult {
    /// Builds a result whose total is the sum of the check durations.
    pub fn new(target: Target, checks: Vec<CheckResult>) -> Self {
        let total_duration_ms = checks.iter().map(|c| c.duration_ms).sum();
        Self {
            target,
            checks,
            total_duration_ms,
            timestamp: Local::now(),
        }
    }

    /// Replaces the summed total with a measured wall-clock duration.
    pub fn with_total_duration(mut self, total: Duration) -> Self {
        self.total_duration_ms = duration_ms(total);
        self
    }

    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(CheckResult::is_failure)
    }

    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(CheckResult::is_warning)
    }

    pub fn is_healthy(&self) -> bool {
        self.checks
            .iter()
            .all(|c| matches!(c.status, Status::Success | Status::Skipped))
    }

    pub fn count(&self, status: Status) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn success_count(&self) -> usize {
        self.count(Status::Success)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Status::Warning)
    }

    pub fn failure_count(&self) -> usize {
        self.count(Status::Failure)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(Status::Skipped)
    }

    pub fn worst_status(&self) -> Option<Status> {
        self.checks.iter().map(|c| c.status).max()
    }

    pub fn get_check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

impl Serialize for TargetResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TargetResult", 8)?;
        state.serialize_field("target", self.target.raw())?;
        state.serialize_field("address", &self.target.address())?;
        state.serialize_field("checks", &self.checks)?;
        state.serialize_field("total_duration_ms", &self.total_duration_ms)?;
        state.serialize_field("is_healthy", &self.is_healthy())?;
        state.serialize_field("has_failures", &self.has_failures())?;
        state.serialize_field("has_warnings", &self.has_warnings())?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.end()
    }
}

/// Repeated sequential runs against one target.
///
/// `iterations` always equals `results.len()`; the constructor derives one
/// from the other so a partial benchmark cannot be represented.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub target: Target,
    pub iterations: usize,
    pub results: Vec<TargetResult>,
}

impl BenchmarkResult {
    pub fn new(target: Target, results: Vec<TargetResult>) -> Self {
        Self {
            target,
            iterations: results.len(),
            results,
        }
    }

    fn durations(&self) -> impl Iterator<Item = f64> + '_ {
        self.results.iter().map(|r| r.total_duration_ms)
    }

    pub fn avg_duration_ms(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        self.durations().sum::<f64>() / self.results.len() as f64
    }

    pub fn min_duration_ms(&self) -> f64 {
        self.durations().reduce(f64::min).unwrap_or(0.0)
    }

    pub fn max_duration_ms(&self) -> f64 {
        self.durations().reduce(f64::max).unwrap_or(0.0)
    }

    pub fn healthy_iterations(&self) -> usize {
        self.results.iter().filter(|r| r.is_healthy()).count()
    }

    /// Percentage of iterations that came back healthy.
    pub fn success_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 0.0;
        }
        100.0 * self.healthy_iterations() as f64 / self.results.len() as f64
    }
}

impl Serialize for BenchmarkResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BenchmarkResult", 7)?;
        state.serialize_field("target", self.target.raw())?;
        state.serialize_field("iterations", &self.iterations)?;
        state.serialize_field("avg_duration_ms", &self.avg_duration_ms())?;
        state.serialize_field("min_duration_ms", &self.min_duration_ms())?;
        state.serialize_field("max_duration_ms", &self.max_duration_ms())?;
        state.serialize_field("success_rate", &self.success_rate())?;
        state.serialize_field("runs", &self.results)?;
        state.end()
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
