//! Secure-transport handshake layer.
//!
//! Performs a certificate-validating handshake (system-independent webpki roots,
//! hostname verification on) and rates what was negotiated. The same handshake
//! routine backs the ALPN probe used by the application layer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, ProtocolVersion, RootCertStore};
use strata_common::config::Config;
use strata_common::error::CheckError;
use strata_common::network::target::Target;
use strata_common::result::{CheckResult, Status};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tracing::debug;

use super::{Check, CheckKind, error_chain};

const SLOW_HANDSHAKE: Duration = Duration::from_millis(200);
const EXPIRY_WARNING_DAYS: i64 = 30;
const ALPN_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Static rating of a negotiated protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionRating {
    Excellent,
    Good,
    Deprecated,
    Insecure,
    Unknown,
}

impl VersionRating {
    pub fn of(version: &str) -> Self {
        match version {
            "TLSv1.3" => VersionRating::Excellent,
            "TLSv1.2" => VersionRating::Good,
            "TLSv1.1" | "TLSv1" => VersionRating::Deprecated,
            "SSLv3" | "SSLv2" => VersionRating::Insecure,
            _ => VersionRating::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionRating::Excellent => "excellent",
            VersionRating::Good => "good",
            VersionRating::Deprecated => "deprecated",
            VersionRating::Insecure => "critical",
            VersionRating::Unknown => "unknown",
        }
    }
}

/// Leaf certificate facts, extracted in deep-analysis mode.
#[derive(Debug, Clone)]
pub(crate) struct CertificateInfo {
    pub subject: String,
    pub issuer: String,
    pub not_after: DateTime<Utc>,
    pub serial: String,
}

#[derive(Debug, Clone)]
pub(crate) struct HandshakeInfo {
    pub version: String,
    pub cipher: String,
    pub certificate: Option<CertificateInfo>,
    pub alpn: Option<Vec<u8>>,
}

pub struct TlsCheck;

#[async_trait]
impl Check for TlsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Tls
    }

    async fn run(&self, target: &Target, config: &Config) -> CheckResult {
        let start = Instant::now();
        let outcome = handshake(target, config.timeout_duration(), Vec::new(), config.deep_analysis).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(info) => assess(&info, elapsed, config.deep_analysis, Utc::now()),
            Err(e) => {
                debug!(addr = %target, error = %e, "handshake failed");
                CheckResult::failure(CheckKind::Tls.label(), elapsed, e.summary(), e.to_string())
            }
        }
    }
}

/// Best-effort probe: does the server pick `h2` when offered alongside `http/1.1`?
pub(crate) async fn negotiates_h2(target: &Target, limit: Duration) -> bool {
    if !target.uses_secure_transport() {
        return false;
    }
    let offered = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
    match handshake(target, limit.min(ALPN_PROBE_TIMEOUT), offered, false).await {
        Ok(info) => info.alpn.as_deref() == Some(&b"h2"[..]),
        Err(e) => {
            debug!(addr = %target, error = %e, "ALPN probe failed");
            false
        }
    }
}

fn connector(alpn: Vec<Vec<u8>>) -> Result<TlsConnector, CheckError> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let mut config = ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| CheckError::Handshake(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();
    config.alpn_protocols = alpn;

    Ok(TlsConnector::from(Arc::new(config)))
}

/// Connects and completes a handshake. The leaf certificate is only parsed when `inspect` is set.
async fn handshake(
    target: &Target,
    limit: Duration,
    alpn: Vec<Vec<u8>>,
    inspect: bool,
) -> Result<HandshakeInfo, CheckError> {
    let connector = connector(alpn)?;
    let server_name = ServerName::try_from(target.host().to_string())
        .map_err(|_| CheckError::InvalidServerName(target.host().to_string()))?;

    let stream = timeout(limit, async {
        let tcp = TcpStream::connect((target.host(), target.port())).await?;
        connector.connect(server_name, tcp).await
    })
    .await
    .map_err(|_| CheckError::HandshakeTimeout(limit))?
    .map_err(|e| CheckError::Handshake(error_chain(&e)))?;

    let (_, session) = stream.get_ref();
    let version = session
        .protocol_version()
        .map(version_name)
        .unwrap_or_else(|| "Unknown".to_string());
    let cipher = session
        .negotiated_cipher_suite()
        .map(|suite| format!("{:?}", suite.suite()))
        .unwrap_or_else(|| "Unknown".to_string());
    let certificate = leaf_certificate(session.peer_certificates(), inspect);
    let alpn = session.alpn_protocol().map(<[u8]>::to_vec);

    Ok(HandshakeInfo {
        version,
        cipher,
        certificate,
        alpn,
    })
}

fn version_name(version: ProtocolVersion) -> String {
    match version {
        ProtocolVersion::TLSv1_3 => "TLSv1.3".to_string(),
        ProtocolVersion::TLSv1_2 => "TLSv1.2".to_string(),
        ProtocolVersion::TLSv1_1 => "TLSv1.1".to_string(),
        ProtocolVersion::TLSv1_0 => "TLSv1".to_string(),
        ProtocolVersion::SSLv3 => "SSLv3".to_string(),
        ProtocolVersion::SSLv2 => "SSLv2".to_string(),
        other => format!("{other:?}"),
    }
}

fn leaf_certificate(chain: Option<&[CertificateDer<'_>]>, inspect: bool) -> Option<CertificateInfo> {
    if !inspect {
        return None;
    }
    chain
        .and_then(|chain| chain.first())
        .and_then(|leaf| parse_certificate(leaf.as_ref()))
}

fn parse_certificate(der: &[u8]) -> Option<CertificateInfo> {
    let (_, cert) = x509_parser::parse_x509_certificate(der).ok()?;
    let not_after = DateTime::<Utc>::from_timestamp(cert.validity().not_after.timestamp(), 0)?;
    Some(CertificateInfo {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        not_after,
        serial: cert.raw_serial_as_string(),
    })
}

/// Cipher strength by name pattern.
pub(crate) fn cipher_strength(cipher: &str) -> &'static str {
    const INSECURE: [&str; 5] = ["NULL", "EXPORT", "DES", "MD5", "RC4"];
    const WEAK: [&str; 1] = ["CBC"];

    let upper = cipher.to_ascii_uppercase();
    if INSECURE.iter().any(|p| upper.contains(p)) {
        return "insecure";
    }
    if WEAK.iter().any(|p| upper.contains(p)) {
        return "weak";
    }
    if upper.contains("AES_256_GCM") || upper.contains("CHACHA20") {
        return "strong";
    }
    "good"
}

/// Rates a completed handshake.
///
/// Version drives the base status. In deep mode a slow modern handshake is a
/// warning, an expired certificate is always a failure and a certificate
/// expiring within 30 days raises the status to at least a warning.
pub(crate) fn assess(info: &HandshakeInfo, elapsed: Duration, deep: bool, now: DateTime<Utc>) -> CheckResult {
    let rating = VersionRating::of(&info.version);
    let (mut status, mut details) = match rating {
        VersionRating::Insecure => (Status::Failure, format!("→ {} (INSECURE!)", info.version)),
        VersionRating::Deprecated => (Status::Warning, format!("→ {} (deprecated)", info.version)),
        _ if deep && elapsed > SLOW_HANDSHAKE => (
            Status::Warning,
            format!("→ {} • {} (slow)", info.version, info.cipher),
        ),
        _ => (Status::Success, format!("→ {} • {}", info.version, info.cipher)),
    };
    let mut error = match rating {
        VersionRating::Insecure => Some(format!("Insecure protocol version {}", info.version)),
        _ => None,
    };

    let mut extra: Vec<(&str, strata_common::result::MetaValue)> = Vec::new();
    if deep {
        extra.push(("cipher_strength", cipher_strength(&info.cipher).into()));
        if let Some(cert) = &info.certificate {
            let days_left = (cert.not_after - now).num_days();
            if cert.not_after < now {
                status = Status::Failure;
                details.push_str(" [EXPIRED CERT]");
                error = Some(format!("Certificate expired on {}", cert.not_after.format("%Y-%m-%d")));
            } else if days_left < EXPIRY_WARNING_DAYS {
                status = status.max(Status::Warning);
                details.push_str(" [expires soon]");
            }
            extra.push(("cert_subject", cert.subject.clone().into()));
            extra.push(("cert_issuer", cert.issuer.clone().into()));
            extra.push(("cert_expires", cert.not_after.to_rfc3339().into()));
            extra.push(("cert_days_until_expiry", days_left.into()));
            extra.push(("cert_serial", cert.serial.clone().into()));
        }
    }

    let mut result = CheckResult::new(CheckKind::Tls.label(), status, elapsed, details)
        .with_metadata("version", info.version.as_str())
        .with_metadata("cipher", info.cipher.as_str())
        .with_metadata("version_rating", rating.as_str());
    for (key, value) in extra {
        result = result.with_metadata(key, value);
    }
    if let Some(error) = error {
        result = result.with_error(error);
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::str::FromStr;
    use strata_common::result::MetaValue;

    const MODERN_CIPHER: &str = "TLS13_AES_256_GCM_SHA384";

    fn info(version: &str, not_after: Option<DateTime<Utc>>) -> HandshakeInfo {
        HandshakeInfo {
            version: version.to_string(),
            cipher: MODERN_CIPHER.to_string(),
            certificate: not_after.map(|not_after| CertificateInfo {
                subject: "CN=good-host".to_string(),
                issuer: "CN=Test CA".to_string(),
                not_after,
                serial: "01:02".to_string(),
            }),
            alpn: None,
        }
    }

    fn fast() -> Duration {
        Duration::from_millis(20)
    }

    #[test]
    fn rating_table() {
        assert_eq!(VersionRating::of("TLSv1.3"), VersionRating::Excellent);
        assert_eq!(VersionRating::of("TLSv1.2"), VersionRating::Good);
        assert_eq!(VersionRating::of("TLSv1.1"), VersionRating::Deprecated);
        assert_eq!(VersionRating::of("TLSv1"), VersionRating::Deprecated);
        assert_eq!(VersionRating::of("SSLv3"), VersionRating::Insecure);
        assert_eq!(VersionRating::of("QUICv1"), VersionRating::Unknown);
    }

    #[test]
    fn modern_version_succeeds() {
        let result = assess(&info("TLSv1.3", None), fast(), false, Utc::now());
        assert_eq!(result.status, Status::Success);
        assert_eq!(result.details, format!("→ TLSv1.3 • {MODERN_CIPHER}"));
        assert!(result.error.is_none());
        assert_eq!(result.metadata["version_rating"].as_text(), Some("excellent"));
    }

    #[test]
    fn deprecated_version_warns() {
        let result = assess(&info("TLSv1.1", None), fast(), false, Utc::now());
        assert_eq!(result.status, Status::Warning);
        assert!(result.details.contains("deprecated"));
    }

    #[test]
    fn legacy_version_fails_as_insecure() {
        let result = assess(&info("SSLv3", None), fast(), false, Utc::now());
        assert_eq!(result.status, Status::Failure);
        assert!(result.details.contains("INSECURE"));
        assert!(result.error.is_some());
    }

    #[test]
    fn certificate_is_ignored_outside_deep_mode() {
        let expired = Utc::now() - TimeDelta::days(3);
        let result = assess(&info("TLSv1.3", Some(expired)), fast(), false, Utc::now());
        assert_eq!(result.status, Status::Success);
        assert!(!result.metadata.contains_key("cert_subject"));
    }

    #[test]
    fn expired_certificate_fails_regardless_of_version() {
        let now = Utc::now();
        let result = assess(&info("TLSv1.3", Some(now - TimeDelta::days(1))), fast(), true, now);
        assert_eq!(result.status, Status::Failure);
        assert!(result.details.ends_with("[EXPIRED CERT]"));
        assert!(result.error.as_deref().is_some_and(|e| e.starts_with("Certificate expired")));
    }

    #[test]
    fn expiring_certificate_warns() {
        let now = Utc::now();
        let result = assess(&info("TLSv1.2", Some(now + TimeDelta::days(10))), fast(), true, now);
        assert_eq!(result.status, Status::Warning);
        assert!(result.details.ends_with("[expires soon]"));
        assert_eq!(result.metadata["cert_days_until_expiry"], MetaValue::Integer(10));
        assert_eq!(result.metadata["cert_subject"].as_text(), Some("CN=good-host"));
    }

    #[test]
    fn expiring_certificate_does_not_mask_insecure_version() {
        let now = Utc::now();
        let result = assess(&info("SSLv3", Some(now + TimeDelta::days(10))), fast(), true, now);
        assert_eq!(result.status, Status::Failure);
    }

    #[test]
    fn slow_handshake_warns_only_in_deep_mode() {
        let slow = Duration::from_millis(350);
        let far = Some(Utc::now() + TimeDelta::days(365));
        assert_eq!(assess(&info("TLSv1.3", far), slow, false, Utc::now()).status, Status::Success);

        let result = assess(&info("TLSv1.3", far), slow, true, Utc::now());
        assert_eq!(result.status, Status::Warning);
        assert!(result.details.ends_with("(slow)"));
    }

    #[test]
    fn cipher_strength_patterns() {
        assert_eq!(cipher_strength("TLS13_AES_256_GCM_SHA384"), "strong");
        assert_eq!(cipher_strength("TLS13_CHACHA20_POLY1305_SHA256"), "strong");
        assert_eq!(cipher_strength("TLS13_AES_128_GCM_SHA256"), "good");
        assert_eq!(cipher_strength("TLS_RSA_WITH_AES_128_CBC_SHA"), "weak");
        assert_eq!(cipher_strength("TLS_RSA_WITH_3DES_EDE_CBC_SHA"), "insecure");
        assert_eq!(cipher_strength("TLS_RSA_WITH_RC4_128_MD5"), "insecure");
    }

    #[test]
    fn garbage_certificate_is_ignored() {
        assert!(parse_certificate(&[0x30, 0x03, 0x01, 0x01]).is_none());
    }

    #[test]
    fn certificate_is_left_unparsed_unless_inspected() {
        let chain = [CertificateDer::from(vec![0x30, 0x03, 0x01, 0x01])];
        assert!(leaf_certificate(Some(&chain[..]), false).is_none());
        assert!(leaf_certificate(Some(&chain[..]), true).is_none());
        assert!(leaf_certificate(None, true).is_none());
    }

    #[tokio::test]
    async fn alpn_probe_skips_plain_targets() {
        let target = Target::from_str("http://127.0.0.1:1/").unwrap();
        assert!(!negotiates_h2(&target, Duration::from_secs(1)).await);
    }
}
