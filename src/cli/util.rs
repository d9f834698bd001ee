//! CLI Common Utilities
//!
//! Shared initialization for command handlers: configuration, the inference
//! client stack and the account service.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::account::{AccountService, JsonFileStore};
use crate::ai::{CredentialPool, HttpTransport, InferenceClient, SharedTransport};
use crate::config::{Config, ConfigLoader};
use crate::study::StudyAssistant;
use crate::types::Result;

/// Command execution context
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
}

impl CommandContext {
    pub fn load() -> Result<Self> {
        Ok(Self {
            config: ConfigLoader::load()?,
        })
    }

    /// Credentials from config, or the API key env vars when config has none
    pub fn credential_pool(&self) -> Result<CredentialPool> {
        let inference = &self.config.inference;
        if inference.api_keys.is_empty() {
            debug!("No API keys in config, reading environment");
            CredentialPool::from_env(inference.rotation)
        } else {
            CredentialPool::new(inference.api_keys.iter(), inference.rotation)
        }
    }

    /// Full inference stack over HTTP
    pub fn assistant(&self) -> Result<StudyAssistant> {
        let inference = &self.config.inference;
        let transport: SharedTransport = Arc::new(HttpTransport::new(inference.timeout())?);
        let client = InferenceClient::new(
            inference.endpoint.clone(),
            self.credential_pool()?,
            transport,
        )
        .with_retry_delay(inference.retry_delay());

        Ok(StudyAssistant::new(
            Arc::new(client),
            self.config.study.clone(),
        ))
    }

    pub fn account_store_path(&self) -> PathBuf {
        ConfigLoader::account_store_path(&self.config)
    }

    pub fn accounts(&self) -> AccountService {
        let store = JsonFileStore::new(self.account_store_path());
        debug!(path = %store.path().display(), "Using account store");
        AccountService::new(Arc::new(store))
    }
}
