//! Inference Layer
//!
//! Talks to the hosted text-generation endpoint.
//!
//! ## Modules
//!
//! - `credentials`: Bearer token pool with a single rotation policy
//! - `transport`: HTTP POST to the endpoint (swappable for tests)
//! - `client`: Credential loop with model-loading retry and error routing

mod client;
mod credentials;
mod transport;

pub use client::{InferenceClient, generated_text};
pub use credentials::{CredentialPool, RotationPolicy};
pub use transport::{HttpTransport, InferenceTransport, SharedTransport, TransportResponse};

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, InferenceError};

use serde::Serialize;

// =============================================================================
// Request Types
// =============================================================================

/// Generation parameters passed through to the model untouched
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Maximum output length
    pub max_length: u32,
    /// Sampling temperature (typically 0.0 - 1.0, not validated here)
    pub temperature: f32,
    /// Whether the completion should echo the prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_full_text: Option<bool>,
}

impl GenerationParams {
    pub fn new(max_length: u32, temperature: f32) -> Self {
        Self {
            max_length,
            temperature,
            return_full_text: None,
        }
    }

    pub fn with_return_full_text(mut self, value: bool) -> Self {
        self.return_full_text = Some(value);
        self
    }
}

/// A single prompt addressed to an endpoint
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    endpoint: String,
    prompt: String,
    params: GenerationParams,
}

impl InferenceRequest {
    pub fn new(
        endpoint: impl Into<String>,
        prompt: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            prompt: prompt.into(),
            params,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Wire body: `{ inputs, parameters }`
    pub fn body(&self) -> RequestBody<'_> {
        RequestBody {
            inputs: &self.prompt,
            parameters: &self.params,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestBody<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
}
