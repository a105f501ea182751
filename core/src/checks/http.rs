use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, redirect};
use strata_common::config::Config;
use strata_common::error::CheckError;
use strata_common::network::target::Target;
use strata_common::result::{CheckResult, Status};
use tracing::debug;

use super::{Check, CheckKind, error_chain, tls};

const USER_AGENT: &str = concat!("strata/", env!("CARGO_PKG_VERSION"));
const LOCATION_WIDTH: usize = 40;
const SECURITY_HEADERS: [&str; 4] = [
    "strict-transport-security",
    "content-security-policy",
    "x-frame-options",
    "x-content-type-options",
];

/// Coarse class of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBand {
    Informational,
    Success,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusBand {
    pub fn of(code: u16) -> Self {
        match code {
            200..=299 => StatusBand::Success,
            300..=399 => StatusBand::Redirect,
            400..=499 => StatusBand::ClientError,
            500..=599 => StatusBand::ServerError,
            _ => StatusBand::Informational,
        }
    }

    /// Any response proves reachability, so nothing here maps to FAILURE.
    pub fn status(&self) -> Status {
        match self {
            StatusBand::Success | StatusBand::Redirect => Status::Success,
            _ => Status::Warning,
        }
    }
}

/// What came back from the single GET.
#[derive(Debug, Clone)]
pub(crate) struct Exchange {
    pub code: u16,
    pub reason: String,
    pub headers: HeaderMap,
    pub body_len: usize,
}

pub struct HttpCheck;

#[async_trait]
impl Check for HttpCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Http
    }

    async fn run(&self, target: &Target, config: &Config) -> CheckResult {
        let limit = config.timeout_duration();
        let start = Instant::now();
        let exchanged = fetch(target, limit).await;
        let elapsed = start.elapsed();

        let exchange = match exchanged {
            Ok(exchange) => exchange,
            Err(e) => {
                debug!(addr = %target, error = %e, "request failed");
                return CheckResult::failure(CheckKind::Http.label(), elapsed, e.summary(), e.to_string());
            }
        };

        let alpn = if (config.deep_analysis || config.check_alpn) && target.uses_secure_transport() {
            Some(tls::negotiates_h2(target, limit).await)
        } else {
            None
        };

        assess(target, &exchange, config, alpn, elapsed)
    }
}

fn client(limit: Duration) -> Result<Client, CheckError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("close"));

    Client::builder()
        .use_rustls_tls()
        .redirect(redirect::Policy::none())
        .timeout(limit)
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| CheckError::Request(error_chain(&e)))
}

async fn fetch(target: &Target, limit: Duration) -> Result<Exchange, CheckError> {
    let request_err = |e: reqwest::Error| {
        if e.is_timeout() {
            CheckError::RequestTimeout(limit)
        } else {
            CheckError::Request(error_chain(&e))
        }
    };

    let response = client(limit)?.get(target.request_url()).send().await.map_err(request_err)?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(request_err)?;

    Ok(Exchange {
        code: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
        headers,
        body_len: body.len(),
    })
}

fn header_text(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Turns a completed exchange into a result.
///
/// `alpn` is the outcome of the protocol probe when one ran. It only decorates
/// `details` and never touches the status.
pub(crate) fn assess(
    target: &Target,
    exchange: &Exchange,
    config: &Config,
    alpn: Option<bool>,
    elapsed: Duration,
) -> CheckResult {
    let band = StatusBand::of(exchange.code);
    let mut details = format!("→ GET {} → {} {}", target.path(), exchange.code, exchange.reason)
        .trim_end()
        .to_string();

    if band == StatusBand::Redirect && config.follow_redirects {
        if let Some(location) = header_text(&exchange.headers, header::LOCATION) {
            let short: String = location.chars().take(LOCATION_WIDTH).collect();
            details.push_str(&format!(" → {short}"));
        }
    }

    match alpn {
        Some(true) => details.push_str(" [HTTP/2]"),
        Some(false) => details.push_str(" [HTTP/1.1]"),
        None => {}
    }

    let mut result = CheckResult::new(CheckKind::Http.label(), band.status(), elapsed, details)
        .with_metadata("status_code", exchange.code)
        .with_metadata("reason", exchange.reason.as_str())
        .with_metadata("path", target.path())
        .with_metadata("response_size", exchange.body_len);

    if let Some(h2) = alpn {
        result = result.with_metadata("http2", h2);
    }

    if config.deep_analysis {
        let security: Vec<String> = SECURITY_HEADERS
            .iter()
            .filter_map(|name| header_text(&exchange.headers, *name).map(|v| format!("{name}: {v}")))
            .collect();
        result = result
            .with_metadata("server", header_text(&exchange.headers, header::SERVER).unwrap_or("Unknown"))
            .with_metadata(
                "content_type",
                header_text(&exchange.headers, header::CONTENT_TYPE).unwrap_or("Unknown"),
            )
            .with_metadata("security_headers", security);
    }

    result
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
