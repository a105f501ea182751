#![cfg(test)]
use std::str::FromStr;

use strata_common::config::Config;
use strata_common::network::target::Target;
use strata_common::result::Status;
use strata_core::Engine;

use crate::support::{closed_port, first_byte_recorder, http_responder, quick_config};

fn statuses(result: &strata_common::result::TargetResult) -> Vec<(&str, Status)> {
    result.checks.iter().map(|c| (c.name.as_str(), c.status)).collect()
}

/// A refused connection ends the run right after the transport check.
#[tokio::test]
async fn refused_port_stops_after_transport() {
    let port = closed_port().await;
    let target = Target::from_str(&format!("127.0.0.1:{port}")).unwrap();

    let result = Engine::new(quick_config()).check_target(&target).await;

    assert_eq!(statuses(&result), vec![("DNS", Status::Success), ("TCP", Status::Failure)]);
    assert!(result.has_failures());
    assert_eq!(
        result.get_check("TCP").and_then(|c| c.error.as_deref()),
        Some("Port closed or service not running")
    );
}

#[tokio::test]
async fn plain_http_target_is_healthy() {
    let port = http_responder("200 OK", "").await;
    let target = Target::from_str(&format!("http://127.0.0.1:{port}/health")).unwrap();

    let result = Engine::new(quick_config()).check_target(&target).await;

    assert_eq!(
        statuses(&result),
        vec![
            ("DNS", Status::Success),
            ("TCP", Status::Success),
            ("TLS", Status::Skipped),
            ("HTTP", Status::Success),
        ]
    );
    assert!(result.is_healthy());
    let http = result.get_check("HTTP").unwrap();
    assert_eq!(http.details, "→ GET /health → 200 OK");
    assert_eq!(http.metadata["status_code"].as_integer(), Some(200));
}

#[tokio::test]
async fn missing_page_is_a_warning() {
    let port = http_responder("404 Not Found", "").await;
    let target = Target::from_str(&format!("http://127.0.0.1:{port}/missing")).unwrap();

    let result = Engine::new(quick_config()).check_target(&target).await;

    assert_eq!(result.get_check("HTTP").map(|c| c.status), Some(Status::Warning));
    assert!(result.has_warnings());
    assert!(!result.has_failures());
}

#[tokio::test]
async fn redirect_records_location() {
    let port = http_responder("301 Moved Permanently", "Location: http://127.0.0.1/elsewhere\r\n").await;
    let target = Target::from_str(&format!("http://127.0.0.1:{port}/")).unwrap();

    let result = Engine::new(quick_config()).check_target(&target).await;

    let http = result.get_check("HTTP").unwrap();
    assert_eq!(http.status, Status::Success);
    assert!(http.details.ends_with("→ http://127.0.0.1/elsewhere"), "{}", http.details);
}

/// A failed handshake is not critical: the application check still runs.
#[tokio::test]
async fn handshake_against_plaintext_fails_but_continues() {
    let port = http_responder("200 OK", "").await;
    let target = Target::from_str(&format!("https://127.0.0.1:{port}/")).unwrap();

    let result = Engine::new(quick_config()).check_target(&target).await;

    assert_eq!(result.checks.len(), 4);
    let tls = result.get_check("TLS").unwrap();
    assert_eq!(tls.status, Status::Failure);
    assert!(tls.error.is_some());
}

#[tokio::test]
async fn transport_only_configuration() {
    let port = http_responder("200 OK", "").await;
    let config = Config {
        checks: vec!["dns".into(), "tcp".into(), "smtp".into()],
        ..quick_config()
    };
    let target = Target::from_str(&format!("127.0.0.1:{port}")).unwrap();

    let result = Engine::new(config).check_target(&target).await;

    assert_eq!(statuses(&result), vec![("DNS", Status::Success), ("TCP", Status::Success)]);
    assert!(result.is_healthy());
}

/// An `http://` URL on a secure port is handshaked by both the TLS and the HTTP layer.
#[tokio::test]
async fn http_url_on_secure_port_requests_over_tls() {
    const TLS_HANDSHAKE_RECORD: u8 = 0x16;

    let Some(seen) = first_byte_recorder(8443).await else {
        return;
    };
    let target = Target::from_str("http://127.0.0.1:8443/").unwrap();
    assert!(target.uses_secure_transport());
    let config = Config {
        checks: vec!["tls".into(), "http".into()],
        ..quick_config()
    };

    let result = Engine::new(config).check_target(&target).await;

    assert_eq!(statuses(&result), vec![("TLS", Status::Failure), ("HTTP", Status::Failure)]);
    let bytes = seen.lock().unwrap().clone();
    assert_eq!(bytes, vec![TLS_HANDSHAKE_RECORD, TLS_HANDSHAKE_RECORD]);
}
