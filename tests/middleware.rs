//! Middleware behavior tests: security headers, rate limiting, access log.

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let (addr, shutdown) = common::start_service(common::quiet_config()).await;
    let client = reqwest::Client::new();

    // Success response
    let res = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert_eq!(res.headers()["x-frame-options"], "DENY");
    assert_eq!(res.headers()["content-security-policy"], "default-src 'none'");

    // Fallback response is covered too
    let res = client
        .get(format!("http://{}/missing", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");

    shutdown.trigger();
}

#[tokio::test]
async fn test_security_headers_can_be_disabled() {
    let mut config = common::quiet_config();
    config.security.enable_headers = false;
    let (addr, shutdown) = common::start_service(config).await;

    let res = reqwest::Client::new()
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("x-content-type-options").is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_rate_limit_rejects_beyond_window_cap() {
    let mut config = common::quiet_config();
    config.rate_limit.enabled = true;
    config.rate_limit.max_requests = 3;
    config.rate_limit.window_secs = 60;
    let (addr, shutdown) = common::start_service(config).await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        let res = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    let res = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 429);
    // Security headers cover rate-limit rejections too
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Too many requests" }));

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_header_present() {
    let (addr, shutdown) = common::start_service(common::quiet_config()).await;

    let res = reqwest::Client::new()
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    let id = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(!id.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_access_log_file_records_requests() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("access.log");

    let mut config = common::quiet_config();
    config.access_log.enabled = true;
    config.access_log.path = Some(log_path.display().to_string());
    let (addr, shutdown) = common::start_service(config).await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/welcome", addr))
        .json(&json!({ "name": "Dan" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.contains("\"POST /welcome HTTP/1.1\" 200"));
    assert!(contents.starts_with("127.0.0.1 - - ["));

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = common::quiet_config();
    config.security.max_body_size = 64;
    let (addr, shutdown) = common::start_service(config).await;

    let big_name = "x".repeat(1024);
    let res = reqwest::Client::new()
        .post(format!("http://{}/welcome", addr))
        .json(&json!({ "name": big_name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 413);
    // Layer-generated rejections carry the error envelope too
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Request body too large" }));

    shutdown.trigger();
}
