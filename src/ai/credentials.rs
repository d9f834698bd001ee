//! Credential Pool
//!
//! Ordered bearer tokens plus the one rotation policy the request loop consults.
//!
//! ## Policies
//!
//! - **Sticky**: start at the credential that last succeeded, walk the pool circularly
//! - **InOrder**: always start at the first credential

use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::inference as inference_constants;
use crate::types::{Result, StudyError};

/// Where each request starts walking the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationPolicy {
    /// Start from the last credential that produced a success
    #[default]
    Sticky,
    /// Start from the first credential on every request
    InOrder,
}

impl std::str::FromStr for RotationPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sticky" => Ok(Self::Sticky),
            "in-order" | "in_order" | "inorder" => Ok(Self::InOrder),
            _ => Err(format!(
                "Unknown rotation policy: {}. Valid values: sticky, in-order",
                s
            )),
        }
    }
}

/// Non-empty pool of bearer tokens
///
/// Tokens are kept as `SecretString` and never appear in debug output;
/// logs refer to them by position (`key#1`, `key#2`, ...).
pub struct CredentialPool {
    keys: Vec<SecretString>,
    policy: RotationPolicy,
    /// Index of the last credential that succeeded
    cursor: AtomicUsize,
}

impl std::fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPool")
            .field("keys", &format!("[{} REDACTED]", self.keys.len()))
            .field("policy", &self.policy)
            .field("cursor", &self.cursor())
            .finish()
    }
}

impl CredentialPool {
    /// Build a pool, dropping blank entries. Fails if nothing is left.
    pub fn new<I, S>(keys: I, policy: RotationPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<SecretString> = keys
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .map(SecretString::from)
            .collect();

        if keys.is_empty() {
            return Err(StudyError::Config(format!(
                "No API keys configured. Set inference.api_keys in config or one of: {}",
                inference_constants::API_KEYS_ENV.join(", ")
            )));
        }

        debug!(count = keys.len(), ?policy, "Credential pool ready");

        Ok(Self {
            keys,
            policy,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Build a pool from the first non-empty comma separated env var
    pub fn from_env(policy: RotationPolicy) -> Result<Self> {
        let raw = inference_constants::API_KEYS_ENV
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_default();
        Self::new(split_keys(&raw), policy)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Index of the last successful credential
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn get(&self, index: usize) -> &SecretString {
        &self.keys[index % self.keys.len()]
    }

    /// Redacted log label for a credential
    pub fn label(&self, index: usize) -> String {
        format!("key#{}", index + 1)
    }

    /// Indices to visit for one request; each credential appears exactly once
    pub fn order(&self) -> Vec<usize> {
        let len = self.keys.len();
        let start = match self.policy {
            RotationPolicy::Sticky => self.cursor() % len,
            RotationPolicy::InOrder => 0,
        };
        (0..len).map(|offset| (start + offset) % len).collect()
    }

    pub fn record_success(&self, index: usize) {
        if self.policy == RotationPolicy::Sticky {
            self.cursor.store(index % self.keys.len(), Ordering::Release);
        }
    }
}

/// Split a comma or newline separated key list
pub fn split_keys(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}
