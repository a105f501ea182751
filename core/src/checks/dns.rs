//! Address resolution layer.
//!
//! Resolution goes through the platform resolver (`getaddrinfo`), which tokio
//! runs on its blocking pool, so a slow resolver suspends only the calling task.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use strata_common::config::Config;
use strata_common::error::CheckError;
use strata_common::network::target::Target;
use strata_common::result::CheckResult;
use tokio::time::timeout;
use tracing::debug;

use super::{Check, CheckKind};

pub struct DnsCheck;

#[async_trait]
impl Check for DnsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Dns
    }

    async fn run(&self, target: &Target, config: &Config) -> CheckResult {
        let start = Instant::now();
        let resolved = resolve(target.host(), config.timeout_duration()).await;
        let elapsed = start.elapsed();

        match resolved.and_then(|ips| summarize(target.host(), &ips, config.prefer_ipv6, elapsed)) {
            Ok(result) => result,
            Err(e) => {
                debug!(host = target.host(), error = %e, "resolution failed");
                CheckResult::failure(CheckKind::Dns.label(), elapsed, e.summary(), e.to_string())
            }
        }
    }
}

/// Resolves `host` to its unique addresses, in resolver order.
async fn resolve(host: &str, limit: Duration) -> Result<Vec<IpAddr>, CheckError> {
    let addrs = timeout(limit, tokio::net::lookup_host((host, 0)))
        .await
        .map_err(|_| CheckError::ResolutionTimeout(limit))?
        .map_err(CheckError::Resolution)?;

    let mut ips: Vec<IpAddr> = Vec::new();
    for addr in addrs {
        if !ips.contains(&addr.ip()) {
            ips.push(addr.ip());
        }
    }

    Ok(ips)
}

/// Picks the primary address and builds the SUCCESS result.
///
/// The preferred family wins when it has results; otherwise IPv4, otherwise
/// whatever the resolver returned first.
fn summarize(
    host: &str,
    ips: &[IpAddr],
    prefer_ipv6: bool,
    elapsed: Duration,
) -> Result<CheckResult, CheckError> {
    let ipv4: Vec<&IpAddr> = ips.iter().filter(|ip| ip.is_ipv4()).collect();
    let ipv6: Vec<&IpAddr> = ips.iter().filter(|ip| ip.is_ipv6()).collect();

    let primary: IpAddr = match (prefer_ipv6, ipv6.first(), ipv4.first()) {
        (true, Some(v6), _) => **v6,
        (_, _, Some(v4)) => **v4,
        (_, Some(v6), None) => **v6,
        (_, None, None) => return Err(CheckError::NoAddresses(host.to_string())),
    };
    let family = if primary.is_ipv6() { "IPv6" } else { "IPv4" };

    let mut details = format!("→ {primary} ({family})");
    if ips.len() > 1 {
        details.push_str(&format!(" +{} more", ips.len() - 1));
    }

    Ok(CheckResult::success(CheckKind::Dns.label(), elapsed, details)
        .with_metadata("ips", ips.iter().map(IpAddr::to_string).collect::<Vec<String>>())
        .with_metadata("ipv4_count", ipv4.len())
        .with_metadata("ipv6_count", ipv6.len())
        .with_metadata("primary_ip", primary.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
