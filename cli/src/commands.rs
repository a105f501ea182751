pub mod bench;
pub mod check;
pub mod compare;

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use strata_common::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Terminal,
    Json,
}

/// What a run does with its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Check,
    Compare,
    Benchmark(usize),
}

#[derive(Parser, Debug)]
#[command(name = "strata", version)]
#[command(about = "Layered network diagnostics: DNS, TCP, TLS and HTTP.")]
pub struct CommandLine {
    /// Host[:port] or URL to check
    pub targets: Vec<String>,

    /// Read targets from a file, one per line
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Comma-separated checks to run (dns,tcp,tls,http)
    #[arg(short, long, value_delimiter = ',', value_name = "LIST")]
    pub checks: Option<Vec<String>>,

    /// Timeout per attempt, in seconds
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Attempts per check
    #[arg(short, long)]
    pub retries: Option<u32>,

    /// Targets checked concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Prefer IPv6 addresses
    #[arg(short = '6', long)]
    pub ipv6: bool,

    /// Certificate, header and protocol inspection
    #[arg(short, long)]
    pub deep: bool,

    /// Probe for HTTP/2 support
    #[arg(long)]
    pub alpn: bool,

    /// Do not report redirect targets
    #[arg(long)]
    pub no_follow_redirects: bool,

    /// Run the first target N times in a row
    #[arg(short, long, value_name = "N")]
    pub benchmark: Option<usize>,

    /// Show several targets side by side
    #[arg(long)]
    pub compare: bool,

    #[arg(long, value_enum, default_value_t = Format::Terminal)]
    pub format: Format,

    /// Load options from a JSON file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the effective options to a JSON file and exit
    #[arg(long, value_name = "PATH")]
    pub save_config: Option<PathBuf>,

    /// More output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(long)]
    pub no_color: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Layers the flags given on the command line over `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(checks) = &self.checks {
            config.checks = checks
                .iter()
                .map(|c| c.trim().to_ascii_lowercase())
                .filter(|c| !c.is_empty())
                .collect();
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(retries) = self.retries {
            config.retries = retries;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.prefer_ipv6 |= self.ipv6;
        config.deep_analysis |= self.deep;
        config.check_alpn |= self.alpn;
        if self.no_follow_redirects {
            config.follow_redirects = false;
        }
        config
    }

    /// Benchmark wins over compare; compare needs at least two targets.
    pub fn mode(&self, target_count: usize) -> Mode {
        match self.benchmark {
            Some(iterations) => Mode::Benchmark(iterations),
            None if self.compare && target_count > 1 => Mode::Compare,
            None => Mode::Check,
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CommandLine {
        CommandLine::try_parse_from(std::iter::once("strata").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_file_values() {
        let base = Config {
            timeout: 3.0,
            workers: 4,
            ..Config::default()
        };
        let cli = parse(&["-c", "DNS, tcp", "-t", "2.5", "-d", "--no-follow-redirects", "example.com"]);

        let config = cli.apply(base);

        assert_eq!(config.checks, vec!["dns", "tcp"]);
        assert_eq!(config.timeout, 2.5);
        assert_eq!(config.workers, 4);
        assert!(config.deep_analysis);
        assert!(!config.follow_redirects);
        assert_eq!(cli.targets, vec!["example.com"]);
    }

    #[test]
    fn untouched_flags_keep_base() {
        let base = Config {
            prefer_ipv6: true,
            ..Config::default()
        };
        assert_eq!(parse(&["example.com"]).apply(base.clone()), base);
    }

    #[test]
    fn mode_selection() {
        assert_eq!(parse(&["a", "b"]).mode(2), Mode::Check);
        assert_eq!(parse(&["--compare", "a", "b"]).mode(2), Mode::Compare);
        assert_eq!(parse(&["--compare", "a"]).mode(1), Mode::Check);
        assert_eq!(parse(&["-b", "5", "--compare", "a", "b"]).mode(2), Mode::Benchmark(5));
    }

    #[test]
    fn verbosity_and_format() {
        let cli = parse(&["-vv", "--format", "json", "example.com"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, Format::Json);
    }
}
