//! # Probe Target Model
//!
//! Defines the endpoint a diagnostic pipeline runs against.
//!
//! This module parses raw operator input, which can be:
//! * A URL with an explicit scheme (e.g., `https://example.com:8443/health`).
//! * A `host:port` pair (e.g., `example.com:8080`, `[::1]:8443`).
//! * A bare hostname or IP address (e.g., `example.com`, `::1`), probed on port 443.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::str::FromStr;

use serde::Serialize;
use url::{Host, Url};

use crate::error::TargetError;

const DEFAULT_PORT: u16 = 443;
const SECURE_PORTS: [u16; 2] = [443, 8443];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed endpoint. Immutable once built; identity is the raw input.
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    raw: String,
    host: String,
    port: u16,
    scheme: Scheme,
    path: String,
    is_url: bool,
}

impl Target {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_url(&self) -> bool {
        self.is_url
    }

    /// True when the handshake layer applies to this target.
    pub fn uses_secure_transport(&self) -> bool {
        self.scheme == Scheme::Https || SECURE_PORTS.contains(&self.port)
    }

    /// `host:port`, with IPv6 literals bracketed.
    pub fn address(&self) -> String {
        format!("{}:{}", self.bracketed_host(), self.port)
    }

    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.address(), self.path)
    }

    /// The URL the application request goes to. Upgraded to `https` whenever
    /// the handshake layer applies, so the request shares its transport.
    pub fn request_url(&self) -> String {
        let scheme = if self.uses_secure_transport() {
            Scheme::Https
        } else {
            self.scheme
        };
        format!("{}://{}{}", scheme, self.address(), self.path)
    }

    fn bracketed_host(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => format!("[{}]", self.host),
            _ => self.host.clone(),
        }
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Target {}

impl Hash for Target {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Target {
    type Err = TargetError;

    /// Parses a string into a `Target`.
    ///
    /// Scheme inference for non-URL input follows the port: 443 and 8443 are
    /// treated as `https`, everything else as `http`. A suffix after the last
    /// colon that is not numeric is kept as part of the hostname.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(TargetError::Empty);
        }

        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return parse_url(raw);
        }

        if let Some(target) = parse_ip_literal(raw) {
            return Ok(target);
        }

        if let Some(target) = parse_host_port(raw)? {
            return Ok(target);
        }

        Ok(plain(raw, raw.to_string(), DEFAULT_PORT))
    }
}

fn plain(raw: &str, host: String, port: u16) -> Target {
    let scheme = if SECURE_PORTS.contains(&port) {
        Scheme::Https
    } else {
        Scheme::Http
    };
    Target {
        raw: raw.to_string(),
        host,
        port,
        scheme,
        path: "/".to_string(),
        is_url: false,
    }
}

/// Parses `http://` and `https://` URLs.
fn parse_url(raw: &str) -> Result<Target, TargetError> {
    let url = Url::parse(raw).map_err(|e| TargetError::InvalidUrl {
        input: raw.to_string(),
        reason: e.to_string(),
    })?;

    let scheme = if url.scheme() == "https" {
        Scheme::Https
    } else {
        Scheme::Http
    };

    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => return Err(TargetError::MissingHost(raw.to_string())),
    };

    let port = url.port().unwrap_or_else(|| scheme.default_port());
    if port == 0 {
        return Err(TargetError::InvalidPort {
            input: raw.to_string(),
            port: port.to_string(),
        });
    }

    let mut path = url.path().to_string();
    if path.is_empty() {
        path.push('/');
    }
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }

    Ok(Target {
        raw: raw.to_string(),
        host,
        port,
        scheme,
        path,
        is_url: true,
    })
}

/// Bare IP addresses, so that `::1` is not split on its colons.
fn parse_ip_literal(raw: &str) -> Option<Target> {
    let inner = raw
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(raw);
    inner
        .parse::<IpAddr>()
        .ok()
        .map(|addr| plain(raw, addr.to_string(), DEFAULT_PORT))
}

/// Parses `host:port` and `[v6]:port`.
fn parse_host_port(raw: &str) -> Result<Option<Target>, TargetError> {
    let Some((host, port_str)) = raw.rsplit_once(':') else {
        return Ok(None);
    };

    if port_str.is_empty() || !port_str.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }

    let port = match port_str.parse::<u16>() {
        Ok(0) | Err(_) => {
            return Err(TargetError::InvalidPort {
                input: raw.to_string(),
                port: port_str.to_string(),
            });
        }
        Ok(port) => port,
    };

    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() {
        return Err(TargetError::MissingHost(raw.to_string()));
    }

    Ok(Some(plain(raw, host.to_string(), port)))
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

    fn parse(s: &str) -> Target {
        Target::from_str(s).unwrap()
    }

    #[test]
    fn test_simple_host() {
        let target = parse("example.com");
        assert_eq!(target.host(), "example.com");
        assert_eq!(target.port(), 443);
        assert_eq!(target.scheme(), Scheme::Https);
        assert_eq!(target.path(), "/");
        assert!(!target.is_url());
    }

    #[test]
    fn test_host_with_port() {
        let target = parse("example.com:8080");
        assert_eq!(target.host(), "example.com");
        assert_eq!(target.port(), 8080);
        assert_eq!(target.scheme(), Scheme::Http);
        assert_eq!(target.address(), "example.com:8080");
    }

    #[test]
    fn test_urls() {
        let target = parse("http://example.com");
        assert_eq!(target.port(), 80);
        assert_eq!(target.scheme(), Scheme::Http);
        assert!(target.is_url());

        let target = parse("https://example.com:8443/health?deep=1");
        assert_eq!(target.host(), "example.com");
        assert_eq!(target.port(), 8443);
        assert_eq!(target.scheme(), Scheme::Https);
        assert_eq!(target.path(), "/health?deep=1");
        assert_eq!(target.url(), "https://example.com:8443/health?deep=1");
    }

    #[test]
    fn test_ipv6_forms() {
        let target = parse("::1");
        assert_eq!(target.host(), "::1");
        assert_eq!(target.port(), 443);
        assert_eq!(target.address(), "[::1]:443");

        let target = parse("[::1]:8080");
        assert_eq!(target.host(), "::1");
        assert_eq!(target.port(), 8080);

        let target = parse("http://[::1]:9000/");
        assert_eq!(target.host(), "::1");
        assert_eq!(target.address(), "[::1]:9000");
    }

    #[test]
    fn test_secure_transport_inference() {
        assert!(parse("https://example.com").uses_secure_transport());
        assert!(parse("example.com:443").uses_secure_transport());
        assert!(parse("http://example.com:8443").uses_secure_transport());
        assert!(!parse("http://example.com").uses_secure_transport());
        assert!(!parse("example.com:80").uses_secure_transport());
    }

    #[test]
    fn test_request_url_follows_secure_transport() {
        let target = parse("http://example.com:8443/health");
        assert_eq!(target.url(), "http://example.com:8443/health");
        assert_eq!(target.request_url(), "https://example.com:8443/health");

        assert_eq!(parse("example.com:443").request_url(), "https://example.com:443/");
        assert_eq!(parse("example.com:8080").request_url(), "http://example.com:8080/");
        assert_eq!(parse("http://example.com/").request_url(), "http://example.com:80/");
    }

    #[test]
    fn test_non_numeric_suffix_stays_in_host() {
        let target = parse("weird:host");
        assert_eq!(target.host(), "weird:host");
        assert_eq!(target.port(), 443);
    }

    #[test]
    fn test_identity_is_raw_input() {
        assert_eq!(parse("example.com"), parse("  example.com "));
        assert_ne!(parse("example.com"), parse("example.com:443"));
        assert_eq!(parse("example.com:443").to_string(), "example.com:443");
    }

    #[test]
    fn test_invalid_targets() {
        assert_eq!(Target::from_str("   "), Err(TargetError::Empty));
        assert!(matches!(
            Target::from_str("example.com:0"),
            Err(TargetError::InvalidPort { .. })
        ));
        assert!(matches!(
            Target::from_str("example.com:70000"),
            Err(TargetError::InvalidPort { .. })
        ));
        assert!(matches!(
            Target::from_str(":8080"),
            Err(TargetError::MissingHost(_))
        ));
        assert!(matches!(
            Target::from_str("https://"),
            Err(TargetError::InvalidUrl { .. })
        ));
    }
}
