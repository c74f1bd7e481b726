//! End-to-end routing and forwarding tests: alias resolution, path rewrite
//! conventions, CORS authority, and failure paths.

use std::collections::HashMap;
use std::time::{Duration, Instant};

mod common;

#[tokio::test]
async fn plain_segment_forwards_full_path() {
    let backend = common::start_backend(200, r#"{"items":[]}"#).await;
    let directory = common::start_directory(HashMap::from([(
        "orders".to_string(),
        vec![("127.0.0.1".to_string(), backend.port())],
    )]))
    .await;
    let gateway = common::start_gateway(common::test_config(&directory.url())).await;

    let response = common::http_client()
        .get(gateway.url("/api/orders/list"))
        .header("Origin", "http://app.local")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("x-echo-path").unwrap(),
        "/api/orders/list"
    );

    // The gateway is the sole CORS authority: exactly one allow-origin,
    // echoing the request origin, and the backend's value is gone.
    let origins: Vec<_> = response
        .headers()
        .get_all("access-control-allow-origin")
        .iter()
        .collect();
    assert_eq!(origins.len(), 1);
    assert_eq!(origins[0], "http://app.local");
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .unwrap(),
        "true"
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-expose-headers")
            .unwrap(),
        "Content-Disposition, Content-Type, Content-Length"
    );
}

#[tokio::test]
async fn legacy_service_segment_is_stripped() {
    let backend = common::start_backend(200, "{}").await;
    let directory = common::start_directory(HashMap::from([(
        "auth-service".to_string(),
        vec![("127.0.0.1".to_string(), backend.port())],
    )]))
    .await;
    let gateway = common::start_gateway(common::test_config(&directory.url())).await;

    let response = common::http_client()
        .get(gateway.url("/api/auth-service/Auth/login"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("x-echo-path").unwrap(),
        "/api/Auth/login"
    );
    assert_eq!(directory.lookups("auth-service"), 1);
}

#[tokio::test]
async fn alias_resolves_registry_name() {
    let backend = common::start_backend(200, "{}").await;
    let directory = common::start_directory(HashMap::from([(
        "billing-service".to_string(),
        vec![("127.0.0.1".to_string(), backend.port())],
    )]))
    .await;
    let mut config = common::test_config(&directory.url());
    config
        .routing
        .service_aliases
        .insert("billing".to_string(), "billing-service".to_string());
    let gateway = common::start_gateway(config).await;

    let response = common::http_client()
        .get(gateway.url("/api/billing/invoices"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    // The directory saw the aliased name, never the literal segment.
    assert_eq!(directory.lookups("billing-service"), 1);
    assert_eq!(directory.lookups("billing"), 0);
    // Alias application strips the public segment from the forwarded path.
    assert_eq!(response.headers().get("x-echo-path").unwrap(), "/api/invoices");
}

#[tokio::test]
async fn query_string_is_preserved() {
    let backend = common::start_backend(200, "{}").await;
    let directory = common::start_directory(HashMap::from([(
        "orders".to_string(),
        vec![("127.0.0.1".to_string(), backend.port())],
    )]))
    .await;
    let gateway = common::start_gateway(common::test_config(&directory.url())).await;

    let response = common::http_client()
        .get(gateway.url("/api/orders/list?page=2&sort=desc"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("x-echo-query").unwrap(),
        "page=2&sort=desc"
    );
}

#[tokio::test]
async fn malformed_paths_rejected_before_any_lookup() {
    let directory = common::start_directory(HashMap::new()).await;
    let gateway = common::start_gateway(common::test_config(&directory.url())).await;
    let client = common::http_client();

    for path in ["/metrics", "/api", "/api/"] {
        let response = client.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(response.status(), 400, "path {path}");

        // Errors still satisfy the CORS invariant.
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["code"], 400);
        assert!(body["message"].is_string());
    }

    assert_eq!(directory.total_lookups(), 0);
}

#[tokio::test]
async fn no_healthy_instances_is_503() {
    let directory = common::start_directory(HashMap::from([(
        "orders".to_string(),
        Vec::new(),
    )]))
    .await;
    let gateway = common::start_gateway(common::test_config(&directory.url())).await;

    let response = common::http_client()
        .get(gateway.url("/api/orders/list"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 503);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], 503);
    assert_eq!(body["message"], "service orders not available");
}

#[tokio::test]
async fn directory_down_is_503() {
    // Point the gateway at a port nothing listens on.
    let gateway = common::start_gateway(common::test_config("http://127.0.0.1:9")).await;

    let response = common::http_client()
        .get(gateway.url("/api/orders/list"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn upstream_refused_is_502_with_generic_message() {
    // Resolves fine, but the endpoint itself is dead.
    let directory = common::start_directory(HashMap::from([(
        "orders".to_string(),
        vec![("127.0.0.1".to_string(), 9)],
    )]))
    .await;
    let gateway = common::start_gateway(common::test_config(&directory.url())).await;

    let response = common::http_client()
        .get(gateway.url("/api/orders/list"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "upstream request failed");
}

#[tokio::test]
async fn request_deadline_bounds_a_trickling_body() {
    // Headers arrive promptly, then the body drips one chunk every 200ms
    // for ten seconds. The whole-exchange deadline must cut the transfer,
    // not just the wait for headers.
    let backend = common::start_sse_backend(vec!["chunk"; 50], Duration::from_millis(200)).await;
    let directory = common::start_directory(HashMap::from([(
        "orders".to_string(),
        vec![("127.0.0.1".to_string(), backend.port())],
    )]))
    .await;
    let mut config = common::test_config(&directory.url());
    config.timeouts.request_secs = 1;
    let gateway = common::start_gateway(config).await;

    let started = Instant::now();
    let response = common::http_client()
        .get(gateway.url("/api/orders/export"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // The body is cut when the deadline fires, surfacing as a transfer
    // error on the client side.
    let body = response.bytes().await;
    let elapsed = started.elapsed();
    assert!(body.is_err(), "trickling body was relayed to completion");
    assert!(
        elapsed < Duration::from_secs(4),
        "transfer ran {elapsed:?}, deadline of 1s not enforced"
    );
}

#[tokio::test]
async fn resolution_is_never_cached() {
    let backend = common::start_backend(200, "{}").await;
    let directory = common::start_directory(HashMap::from([(
        "orders".to_string(),
        vec![("127.0.0.1".to_string(), backend.port())],
    )]))
    .await;
    let gateway = common::start_gateway(common::test_config(&directory.url())).await;
    let client = common::http_client();

    for _ in 0..2 {
        let response = client.get(gateway.url("/api/orders/list")).send().await.unwrap();
        assert_eq!(response.status(), 200);
    }

    assert_eq!(directory.lookups("orders"), 2);
}

#[tokio::test]
async fn wildcard_origin_when_no_origin_header() {
    let backend = common::start_backend(200, "{}").await;
    let directory = common::start_directory(HashMap::from([(
        "orders".to_string(),
        vec![("127.0.0.1".to_string(), backend.port())],
    )]))
    .await;
    let gateway = common::start_gateway(common::test_config(&directory.url())).await;

    let response = common::http_client()
        .get(gateway.url("/api/orders/list"))
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
    assert!(response
        .headers()
        .get("access-control-allow-credentials")
        .is_none());
}

#[tokio::test]
async fn health_and_root_bypass_routing() {
    let directory = common::start_directory(HashMap::new()).await;
    let gateway = common::start_gateway(common::test_config(&directory.url())).await;
    let client = common::http_client();

    let health = client.get(gateway.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);
    let body: serde_json::Value = health.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let root = client.get(gateway.url("/")).send().await.unwrap();
    assert_eq!(root.status(), 200);

    assert_eq!(directory.total_lookups(), 0);
}
