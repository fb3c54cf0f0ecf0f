//! End-to-end tests: client → gateway → upstream.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use document_gateway::config::GatewayConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_static_upstream_serves_documents() {
    let gateway = common::start_gateway(GatewayConfig::default()).await;

    let res = common::client()
        .get(gateway.url("/documents/2023-05-30"))
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "documents": ["doc1", "doc2", "doc3"] }));

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_http_upstream_documents_pass_through() {
    let upstream = common::start_programmable_upstream(|| async {
        (200, r#"{"documents":["a-1","b-2"]}"#.to_string())
    })
    .await;
    let gateway = common::start_gateway(common::http_upstream_config(upstream)).await;

    let res = common::client()
        .get(gateway.url("/documents/2024-01-15"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "documents": ["a-1", "b-2"] }));

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_retry_on_transient_upstream_failure() {
    let calls = Arc::new(AtomicU32::new(0));
    let cc = calls.clone();
    let upstream = common::start_programmable_upstream(move || {
        let cc = cc.clone();
        async move {
            if cc.fetch_add(1, Ordering::SeqCst) < 2 {
                (503, r#"{"error":"busy"}"#.to_string())
            } else {
                (200, r#"{"documents":["doc1"]}"#.to_string())
            }
        }
    })
    .await;
    let gateway = common::start_gateway(common::http_upstream_config(upstream)).await;
    let client = common::client();

    let res = client
        .get(gateway.url("/documents/2023-05-30"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK, "Should eventually succeed after retries");
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let status: Value = client
        .get(gateway.url("/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["upstream_calls"], 3);
    assert_eq!(status["rate_limit"]["in_window"], 1);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_fatal_upstream_failure_is_not_retried() {
    let calls = Arc::new(AtomicU32::new(0));
    let cc = calls.clone();
    let upstream = common::start_programmable_upstream(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (404, r#"{"error":"unknown"}"#.to_string())
        }
    })
    .await;
    let gateway = common::start_gateway(common::http_upstream_config(upstream)).await;

    let res = common::client()
        .get(gateway.url("/documents/2023-05-30"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("404"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_exhausted_retries_report_detail() {
    let calls = Arc::new(AtomicU32::new(0));
    let cc = calls.clone();
    let upstream = common::start_programmable_upstream(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (503, String::new())
        }
    })
    .await;
    let mut config = common::http_upstream_config(upstream);
    config.retries.max_attempts = 3;
    let gateway = common::start_gateway(config).await;

    let res = common::client()
        .get(gateway.url("/documents/2023-05-30"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("retries exhausted after 3 attempts"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_date_is_rejected_without_upstream_call() {
    let gateway = common::start_gateway(GatewayConfig::default()).await;
    let client = common::client();

    let res = client
        .get(gateway.url("/documents/2023-13-45"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let status: Value = client
        .get(gateway.url("/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["upstream_calls"], 0);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_rate_limit_delays_instead_of_rejecting() {
    let mut config = GatewayConfig::default();
    config.rate_limit.capacity = 2;
    config.rate_limit.period_secs = 1;
    let gateway = common::start_gateway(config).await;
    let client = common::client();
    let url = gateway.url("/documents/2023-05-30");

    let start = Instant::now();
    let tasks: Vec<_> = (0..3)
        .map(|_| {
            let client = client.clone();
            let url = url.clone();
            tokio::spawn(async move {
                let res = client.get(&url).send().await.unwrap();
                (res.status(), start.elapsed())
            })
        })
        .collect();

    let mut elapsed = Vec::new();
    for task in tasks {
        let (status, took) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK, "Throttled calls must not be rejected");
        elapsed.push(took);
    }
    elapsed.sort();

    assert!(
        elapsed[2] >= Duration::from_secs(1),
        "third request finished after {:?}",
        elapsed[2]
    );

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_deadline_turns_long_wait_into_gateway_timeout() {
    let mut config = GatewayConfig::default();
    config.rate_limit.capacity = 1;
    config.rate_limit.period_secs = 60;
    config.timeouts.request_secs = 1;
    let gateway = common::start_gateway(config).await;
    let client = common::client();

    let first = client
        .get(gateway.url("/documents/2023-05-30"))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = client
        .get(gateway.url("/documents/2023-05-31"))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::GATEWAY_TIMEOUT);

    gateway.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let gateway = common::start_gateway(GatewayConfig::default()).await;

    gateway.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), gateway.handle)
        .await
        .expect("server did not stop");

    assert!(result.unwrap().is_ok());
}
