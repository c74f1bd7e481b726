//! HTTP service directory adapter.
//!
//! Queries a Consul-compatible registry for healthy instances of a logical
//! service and returns the first one. The registry is the only source of
//! endpoints; the gateway holds no routing table of its own.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::DirectoryConfig;

/// A resolved backend address. Created fresh per request, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// `host:port` form used as the upstream URI authority.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Directory lookup failures.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Zero healthy instances registered for the service.
    #[error("service {0} has no healthy instances")]
    NotFound(String),

    /// The registry itself could not be reached or answered abnormally.
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a logical service name to a reachable endpoint.
#[async_trait]
pub trait ServiceDirectory: Send + Sync {
    async fn resolve(&self, service: &str) -> Result<Endpoint, DirectoryError>;
}

/// Registry health-query response entry.
#[derive(Debug, Deserialize)]
struct HealthEntry {
    #[serde(rename = "Service")]
    service: ServiceEntry,
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    #[serde(rename = "Service")]
    name: String,
    #[serde(rename = "Address", default)]
    address: String,
    #[serde(rename = "Port")]
    port: u16,
}

/// Directory client backed by the registry's HTTP health API.
pub struct HttpDirectory {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDirectory {
    pub fn new(config: &DirectoryConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.address.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl ServiceDirectory for HttpDirectory {
    async fn resolve(&self, service: &str) -> Result<Endpoint, DirectoryError> {
        let url = format!("{}/v1/health/service/{}", self.base_url, service);

        let response = self
            .client
            .get(&url)
            .query(&[("passing", "true")])
            .send()
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DirectoryError::Unavailable(format!(
                "registry returned {}",
                response.status()
            )));
        }

        let entries: Vec<HealthEntry> = response
            .json()
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        pick_endpoint(entries, service)
    }
}

/// First-entry selection in registry order. Entries with an empty address
/// field fall back to the registered service name as the host.
fn pick_endpoint(entries: Vec<HealthEntry>, service: &str) -> Result<Endpoint, DirectoryError> {
    let Some(first) = entries.into_iter().next() else {
        return Err(DirectoryError::NotFound(service.to_string()));
    };

    let host = if first.service.address.is_empty() {
        first.service.name
    } else {
        first.service.address
    };

    Ok(Endpoint {
        host,
        port: first.service.port,
    })
}
