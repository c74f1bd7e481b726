//! Remote token validation against the identity service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::header;
use thiserror::Error;

use crate::config::AuthConfig;
use crate::directory::ServiceDirectory;

/// Token validation failures. All of them surface as 401 to the client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token rejected by identity service")]
    InvalidToken,

    #[error("identity service unreachable: {0}")]
    Unreachable(String),
}

/// Confirms bearer token validity. Pass/fail only, no claim extraction.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<(), AuthError>;
}

/// Authenticator that delegates to the identity service resolved through
/// the service directory on every call.
pub struct RemoteAuthenticator {
    directory: Arc<dyn ServiceDirectory>,
    client: reqwest::Client,
    service: String,
    validate_path: String,
}

impl RemoteAuthenticator {
    pub fn new(
        config: &AuthConfig,
        directory: Arc<dyn ServiceDirectory>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            directory,
            client,
            service: config.service.clone(),
            validate_path: config.validate_path.clone(),
        })
    }
}

#[async_trait]
impl Authenticator for RemoteAuthenticator {
    async fn validate(&self, token: &str) -> Result<(), AuthError> {
        let endpoint = self
            .directory
            .resolve(&self.service)
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        let url = format!("http://{}{}", endpoint.authority(), self.validate_path);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            tracing::debug!(status = %response.status(), "identity service rejected token");
            Err(AuthError::InvalidToken)
        }
    }
}
