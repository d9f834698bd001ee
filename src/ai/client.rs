//! Inference Client with Credential Rotation
//!
//! Walks the credential pool for every request and routes failures by category.
//!
//! ## Strategy
//!
//! 1. Ask the pool for this request's credential order
//! 2. POST with the credential as a bearer token
//! 3. 503 (model loading): wait the fixed delay, retry the same credential once
//! 4. 401/403 (invalid key): move to the next credential immediately
//! 5. Anything else that is not a success: stop and surface the error
//! 6. Pool exhausted: surface the last error

use std::time::Duration;

use backon::{ConstantBuilder, Retryable};
use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::credentials::CredentialPool;
use super::transport::SharedTransport;
use super::{GenerationParams, InferenceRequest};
use crate::constants::inference as inference_constants;
use crate::types::{ErrorClassifier, InferenceError, Result, StudyError};

/// Resilient client for the text-generation endpoint
pub struct InferenceClient {
    endpoint: String,
    pool: CredentialPool,
    transport: SharedTransport,
    retry_delay: Duration,
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient")
            .field("endpoint", &self.endpoint)
            .field("pool", &self.pool)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

impl InferenceClient {
    pub fn new(endpoint: impl Into<String>, pool: CredentialPool, transport: SharedTransport) -> Self {
        Self {
            endpoint: endpoint.into(),
            pool,
            transport,
            retry_delay: Duration::from_millis(inference_constants::MODEL_LOADING_RETRY_DELAY_MS),
        }
    }

    /// Override the model-loading retry delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// Send a request, rotating credentials as needed, and return the decoded JSON body
    #[instrument(skip(self, request), fields(endpoint = %request.endpoint(), keys = self.pool.len()))]
    pub async fn request_completion(&self, request: &InferenceRequest) -> Result<Value> {
        let mut last_error: Option<InferenceError> = None;
        let mut tried = 0usize;

        for index in self.pool.order() {
            let label = self.pool.label(index);
            let token = self.pool.get(index);
            tried += 1;

            debug!(credential = %label, "Trying credential");

            let label_ref = label.as_str();
            let outcome = (move || self.attempt(request, token, label_ref))
                .retry(
                    ConstantBuilder::default()
                        .with_delay(self.retry_delay)
                        .with_max_times(inference_constants::MODEL_LOADING_RETRIES),
                )
                .when(|e: &InferenceError| e.is_retryable())
                .notify(|e: &InferenceError, wait: Duration| {
                    warn!(
                        credential = %label_ref,
                        wait_ms = wait.as_millis() as u64,
                        error = %e,
                        "Model loading, retrying same credential"
                    );
                })
                .await;

            match outcome {
                Ok(value) => {
                    self.pool.record_success(index);
                    info!(credential = %label, tried, "Inference request succeeded");
                    return Ok(value);
                }
                Err(err) if err.should_rotate() => {
                    warn!(credential = %label, category = %err.category, "Credential failed, trying next");
                    last_error = Some(err);
                }
                Err(err) => {
                    warn!(credential = %label, error = %err, "Fatal inference error");
                    return Err(err.into());
                }
            }
        }

        Err(InferenceError::exhausted(tried, last_error.as_ref()).into())
    }

    /// Send `prompt` to the configured endpoint and return the first completion's text
    pub async fn complete(&self, prompt: &str, params: GenerationParams) -> Result<String> {
        let request = InferenceRequest::new(self.endpoint.clone(), prompt, params);
        let value = self.request_completion(&request).await?;
        generated_text(&value)
    }

    /// One POST with one credential, classified
    async fn attempt(
        &self,
        request: &InferenceRequest,
        token: &SecretString,
        label: &str,
    ) -> std::result::Result<Value, InferenceError> {
        let response = self
            .transport
            .post(request, token)
            .await
            .map_err(|e| e.credential(label))?;

        if !response.is_success() {
            return Err(
                ErrorClassifier::classify_http_status(response.status, &response.reason)
                    .credential(label),
            );
        }

        serde_json::from_str(&response.body).map_err(|e| {
            InferenceError::transport(format!("Failed to parse response: {}", e))
                .status(response.status)
                .credential(label)
        })
    }
}

/// Extract the completion text from a text-generation response
///
/// Accepts the usual `[{"generated_text": ...}]` shape and a bare object.
pub fn generated_text(value: &Value) -> Result<String> {
    let entry = match value {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(value),
        _ => None,
    };

    entry
        .and_then(|e| e.get("generated_text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            StudyError::InvalidResponse("missing generated_text in completion".to_string())
        })
}
