//! Inference Transport
//!
//! A single authenticated POST to the text-generation endpoint.
//! The transport reports whatever status came back; classification lives in the client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::InferenceRequest;
use crate::types::{InferenceError, Result, StudyError};

/// Raw endpoint answer
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    /// Canonical reason phrase (e.g. "Service Unavailable")
    pub reason: String,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        Self {
            status,
            reason,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request with one credential
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    /// Issue a POST carrying `token` as a bearer credential.
    ///
    /// Only connection-level failures are errors; any HTTP status is returned as-is.
    async fn post(
        &self,
        request: &InferenceRequest,
        token: &SecretString,
    ) -> std::result::Result<TransportResponse, InferenceError>;
}

/// Shared transport type for the client.
pub type SharedTransport = Arc<dyn InferenceTransport>;

/// reqwest-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StudyError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl InferenceTransport for HttpTransport {
    async fn post(
        &self,
        request: &InferenceRequest,
        token: &SecretString,
    ) -> std::result::Result<TransportResponse, InferenceError> {
        let start_time = Instant::now();

        let response = self
            .client
            .post(request.endpoint())
            .header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request.body())
            .send()
            .await
            .map_err(|e| InferenceError::transport(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| InferenceError::transport(format!("Failed to read response: {}", e)))?;

        debug!(
            status,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            bytes = body.len(),
            "Endpoint responded"
        );

        Ok(TransportResponse::new(status, body))
    }
}
