//! Shared utilities for integration tests: an in-process mock service
//! directory, mock backends, a raw-TCP SSE backend with controlled chunk
//! timing, and a gateway spawner.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::http::Response;
use axum::routing::get;
use axum::{Json, Router};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use edge_gateway::config::GatewayConfig;
use edge_gateway::{GatewayServer, Shutdown};

/// Handle to a running mock registry; counts lookups per service name.
pub struct MockDirectory {
    pub addr: SocketAddr,
    counts: Arc<Mutex<HashMap<String, u32>>>,
}

impl MockDirectory {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn lookups(&self, service: &str) -> u32 {
        *self.counts.lock().unwrap().get(service).unwrap_or(&0)
    }

    pub fn total_lookups(&self) -> u32 {
        self.counts.lock().unwrap().values().sum()
    }
}

#[derive(Clone)]
struct DirectoryState {
    services: Arc<HashMap<String, Vec<(String, u16)>>>,
    counts: Arc<Mutex<HashMap<String, u32>>>,
}

/// Start a mock registry serving the Consul-style health query API.
pub async fn start_directory(services: HashMap<String, Vec<(String, u16)>>) -> MockDirectory {
    let counts = Arc::new(Mutex::new(HashMap::new()));
    let state = DirectoryState {
        services: Arc::new(services),
        counts: counts.clone(),
    };

    let app = Router::new()
        .route("/v1/health/service/{service}", get(directory_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockDirectory { addr, counts }
}

async fn directory_handler(
    State(state): State<DirectoryState>,
    Path(service): Path<String>,
) -> Json<serde_json::Value> {
    *state
        .counts
        .lock()
        .unwrap()
        .entry(service.clone())
        .or_insert(0) += 1;

    let instances = state.services.get(&service).cloned().unwrap_or_default();
    let entries: Vec<serde_json::Value> = instances
        .into_iter()
        .map(|(host, port)| {
            serde_json::json!({
                "Service": { "Service": service, "Address": host, "Port": port }
            })
        })
        .collect();
    Json(serde_json::Value::Array(entries))
}

/// Start a mock backend that echoes the forwarded path and query in headers
/// and sets its own CORS headers (which the gateway must strip).
pub async fn start_backend(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new().fallback(move |request: Request| async move {
        let path = request.uri().path().to_string();
        let query = request.uri().query().unwrap_or("").to_string();
        Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .header("x-echo-path", path)
            .header("x-echo-query", query)
            .header("access-control-allow-origin", "http://backend.internal")
            .header("access-control-expose-headers", "X-Backend-Secret")
            .body(Body::from(body))
            .unwrap()
    });

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Start a raw-TCP SSE backend that writes `chunks` one by one with `gap`
/// between writes, flushing each, then closes the connection.
pub async fn start_sse_backend(chunks: Vec<&'static str>, gap: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let chunks = chunks.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let head = "HTTP/1.1 200 OK\r\n\
                            Content-Type: text/event-stream\r\n\
                            Connection: close\r\n\r\n";
                if socket.write_all(head.as_bytes()).await.is_err() {
                    return;
                }
                let _ = socket.flush().await;

                for chunk in &chunks {
                    tokio::time::sleep(gap).await;
                    if socket.write_all(chunk.as_bytes()).await.is_err() {
                        return;
                    }
                    let _ = socket.flush().await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// A running gateway bound to an ephemeral port. Dropping the handle
/// triggers shutdown when the test ends.
pub struct TestGateway {
    pub addr: SocketAddr,
    _shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Spawn the gateway in-process with the production directory client
/// pointed at a mock registry.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = GatewayServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway {
        addr,
        _shutdown: shutdown,
    }
}

/// Base config for tests: directory pointed at the mock, auth off unless a
/// test turns it on.
pub fn test_config(directory_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.directory.address = directory_url.to_string();
    config.directory.timeout_secs = 2;
    config.timeouts.connect_secs = 2;
    config.timeouts.request_secs = 5;
    config.auth.enabled = false;
    config
}

/// Plain HTTP client that ignores any system proxy settings.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
