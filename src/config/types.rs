//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/studymate/) and project (.studymate/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::ai::RotationPolicy;
use crate::constants::{inference as inference_constants, study as study_constants};
use crate::types::{Result, StudyError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Inference endpoint and credentials
    pub inference: InferenceConfig,

    /// Study feature tuning
    pub study: StudyConfig,

    /// Account storage
    pub account: AccountConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            inference: InferenceConfig::default(),
            study: StudyConfig::default(),
            account: AccountConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `StudyError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.inference.endpoint.trim();
        if endpoint.is_empty() {
            return Err(StudyError::Config(
                "inference.endpoint must not be empty".to_string(),
            ));
        }

        let url = url::Url::parse(endpoint).map_err(|e| {
            StudyError::Config(format!("Invalid inference.endpoint '{}': {}", endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StudyError::Config(format!(
                "inference.endpoint must use http or https, got {}",
                url.scheme()
            )));
        }

        if self.inference.timeout_secs == 0 {
            return Err(StudyError::Config(
                "inference.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.study.temperature) {
            return Err(StudyError::Config(format!(
                "study.temperature must be between 0.0 and 2.0, got {}",
                self.study.temperature
            )));
        }

        for (name, value) in [
            ("study.worksheet_max_length", self.study.worksheet_max_length),
            ("study.video_max_length", self.study.video_max_length),
            ("study.chat_max_length", self.study.chat_max_length),
        ] {
            if value == 0 {
                return Err(StudyError::Config(format!(
                    "{} must be greater than 0",
                    name
                )));
            }
        }

        if self.study.worksheet_question_count == 0 {
            return Err(StudyError::Config(
                "study.worksheet_question_count must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Inference Configuration
// =============================================================================

/// Note: API keys are never serialized to output and are redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Text-generation endpoint URL
    pub endpoint: String,

    /// Bearer tokens, tried according to `rotation`
    /// Never serialized to output for security
    #[serde(skip_serializing)]
    pub api_keys: Vec<String>,

    /// Where each request starts in the key list
    pub rotation: RotationPolicy,

    /// Delay before retrying a key that reported "model loading"
    pub retry_delay_ms: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_keys", &format!("[{} REDACTED]", self.api_keys.len()))
            .field("rotation", &self.rotation)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: inference_constants::DEFAULT_ENDPOINT.to_string(),
            api_keys: Vec::new(),
            rotation: RotationPolicy::default(),
            retry_delay_ms: inference_constants::MODEL_LOADING_RETRY_DELAY_MS,
            timeout_secs: inference_constants::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl InferenceConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Study Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Questions requested per worksheet
    pub worksheet_question_count: usize,

    /// Generation length for worksheets
    pub worksheet_max_length: u32,

    /// Generation length for video suggestions
    pub video_max_length: u32,

    /// Generation length for chat replies
    pub chat_max_length: u32,

    /// Sampling temperature for all features
    pub temperature: f32,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            worksheet_question_count: study_constants::WORKSHEET_QUESTION_COUNT,
            worksheet_max_length: study_constants::WORKSHEET_MAX_LENGTH,
            video_max_length: study_constants::VIDEO_MAX_LENGTH,
            chat_max_length: study_constants::CHAT_MAX_LENGTH,
            temperature: study_constants::TEMPERATURE,
        }
    }
}

// =============================================================================
// Account Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// User store file; defaults to the global data directory
    pub store_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.study.worksheet_question_count, 5);
        assert_eq!(config.inference.retry_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.inference.endpoint = "   ".to_string();
        assert!(config.validate().is_err());

        config.inference.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());

        config.inference.endpoint = "ftp://example.com/model".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut config = Config::default();
        config.study.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.study.chat_max_length = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("study.chat_max_length"));

        let mut config = Config::default();
        config.inference.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_keys_never_serialized() {
        let mut config = Config::default();
        config.inference.api_keys = vec!["hf_topsecret".to_string()];

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hf_topsecret"));

        let debug = format!("{:?}", config.inference);
        assert!(!debug.contains("hf_topsecret"));
        assert!(debug.contains("1 REDACTED"));
    }
}
