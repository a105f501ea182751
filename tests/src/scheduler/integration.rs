#![cfg(test)]
use strata_core::Engine;

use crate::support::{closed_port, http_responder, quick_config};

/// One healthy and one refusing target, two workers: order follows input.
#[tokio::test]
async fn mixed_batch_keeps_input_order() {
    let healthy = http_responder("200 OK", "").await;
    let closed = closed_port().await;
    let targets = Engine::parse_targets(&[
        format!("http://127.0.0.1:{healthy}/"),
        format!("127.0.0.1:{closed}"),
    ])
    .unwrap();

    let results = Engine::new(quick_config()).check_targets(&targets).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].target, targets[0]);
    assert_eq!(results[1].target, targets[1]);
    assert!(results[0].is_healthy());
    assert!(results[1].has_failures());
}

#[tokio::test]
async fn benchmark_runs_every_iteration() {
    let port = http_responder("200 OK", "").await;
    let target = Engine::parse_targets(&[format!("http://127.0.0.1:{port}/")])
        .unwrap()
        .remove(0);

    let result = Engine::new(quick_config()).benchmark(&target, 3).await;

    assert_eq!(result.iterations, 3);
    assert_eq!(result.results.len(), 3);
    assert_eq!(result.success_rate(), 100.0);
    assert!(result.min_duration_ms() <= result.avg_duration_ms());
    assert!(result.avg_duration_ms() <= result.max_duration_ms());
}

#[tokio::test]
async fn compare_matches_batch_shape() {
    let first = http_responder("200 OK", "").await;
    let second = http_responder("503 Service Unavailable", "").await;
    let targets = Engine::parse_targets(&[
        format!("http://127.0.0.1:{first}/"),
        format!("http://127.0.0.1:{second}/"),
    ])
    .unwrap();

    let results = Engine::new(quick_config()).compare(&targets).await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_healthy());
    assert!(results[1].has_warnings());
    assert!(!results[1].has_failures());
}
