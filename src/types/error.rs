//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Inference failures carry a category that drives the credential loop.
//!
//! ## Error Categories
//!
//! - **ModelLoading**: Model is warming up on the provider (retry same credential once)
//! - **InvalidCredential**: Token rejected (move to next credential, no delay)
//! - **TransportOrServer**: Anything else (fatal, stop immediately)
//! - **Exhausted**: Every credential in the pool failed

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Inference error categories for credential routing decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// HTTP 503 - model not ready yet, retry the same credential after a delay
    ModelLoading,
    /// HTTP 401/403 - credential rejected, try the next one
    InvalidCredential,
    /// Other status, transport or decode failure - fatal
    TransportOrServer,
    /// All credentials tried without success
    Exhausted,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModelLoading => write!(f, "MODEL_LOADING"),
            Self::InvalidCredential => write!(f, "INVALID_KEY"),
            Self::TransportOrServer => write!(f, "TRANSPORT"),
            Self::Exhausted => write!(f, "EXHAUSTED"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is retryable on the same credential
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ModelLoading)
    }

    /// Check if this category should move on to the next credential
    pub fn should_rotate(&self) -> bool {
        matches!(self, Self::ModelLoading | Self::InvalidCredential)
    }
}

// =============================================================================
// Inference Error
// =============================================================================

/// Inference error with category, HTTP status and credential context
#[derive(Debug, Clone)]
pub struct InferenceError {
    /// Error category for routing decisions
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// HTTP status, when the endpoint answered
    pub status: Option<u16>,
    /// Redacted label of the credential in use (e.g. `key#2`)
    pub credential: Option<String>,
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(credential) = &self.credential {
            write!(f, "[{}:{}] {}", credential, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for InferenceError {}

impl InferenceError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            status: None,
            credential: None,
        }
    }

    /// Add credential context to existing error
    pub fn credential(mut self, label: impl Into<String>) -> Self {
        self.credential = Some(label.into());
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Fatal transport or decode failure
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::TransportOrServer, message)
    }

    /// Pool exhausted, wrapping the last failure when there was one
    pub fn exhausted(attempted: usize, last: Option<&InferenceError>) -> Self {
        let message = match last {
            Some(last) => format!("All {} API keys failed; last error: {}", attempted, last),
            None => "All API keys failed".to_string(),
        };
        let mut err = Self::new(ErrorCategory::Exhausted, message);
        err.status = last.and_then(|l| l.status);
        err
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }

    pub fn should_rotate(&self) -> bool {
        self.category.should_rotate()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps endpoint responses onto error categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify a non-success HTTP status
    pub fn classify_http_status(status: u16, message: &str) -> InferenceError {
        let category = match status {
            503 => ErrorCategory::ModelLoading,
            401 | 403 => ErrorCategory::InvalidCredential,
            _ => ErrorCategory::TransportOrServer,
        };
        let message = match category {
            ErrorCategory::ModelLoading => format!("Model is loading: {}", message),
            ErrorCategory::InvalidCredential => format!("Invalid API key: {}", message),
            _ => format!("API Error ({}): {}", status, message),
        };
        InferenceError::new(category, message).status(status)
    }
}

// =============================================================================
// Account Error
// =============================================================================

/// User-facing account failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Name must be at least {min} characters long")]
    InvalidName { min: usize },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password must be at least {min} characters long")]
    InvalidPassword { min: usize },

    #[error("Invalid email or password format")]
    InvalidLoginFormat,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid verification code")]
    InvalidCode,

    #[error("User not found")]
    UserNotFound,

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("Survey is incomplete: {0}")]
    IncompleteSurvey(String),
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum StudyError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Inference Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Inference(InferenceError),

    /// Endpoint answered with a body of an unexpected shape
    #[error("Unexpected inference response: {0}")]
    InvalidResponse(String),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Account(#[from] AccountError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<InferenceError> for StudyError {
    fn from(err: InferenceError) -> Self {
        StudyError::Inference(err)
    }
}

pub type Result<T> = std::result::Result<T, StudyError>;

impl StudyError {
    /// Inference category, if this is an inference failure
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Inference(e) => Some(e.category),
            _ => None,
        }
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| StudyError::Storage(format!("{}: {}", context.into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
