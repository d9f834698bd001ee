//! StudyMate - AI Study Assistant
//!
//! Generates worksheets, suggests educational videos and answers questions
//! through a hosted text-generation endpoint.
//!
//! ## Core Features
//!
//! - **Credential Pool**: several API keys tried in turn, with sticky or in-order rotation
//! - **Model Loading Retry**: one delayed retry on the same key when the model is warming up
//! - **Tolerant Parsing**: worksheet and video output parsed with fallbacks, never fatal
//! - **Accounts**: registration, email verification, login and a learning-preferences survey
//!
//! ## Quick Start
//!
//! ```ignore
//! use studymate::{CredentialPool, HttpTransport, InferenceClient, RotationPolicy, StudyAssistant};
//!
//! let pool = CredentialPool::from_env(RotationPolicy::Sticky)?;
//! let transport = Arc::new(HttpTransport::new(Duration::from_secs(120))?);
//! let client = InferenceClient::new(endpoint, pool, transport);
//! let assistant = StudyAssistant::new(Arc::new(client), StudyConfig::default());
//! let worksheet = assistant.generate_worksheet("Math", "5th", "Fractions").await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: inference client, credential rotation, HTTP transport
//! - [`study`]: prompts, response parsers and the study features
//! - [`account`]: user records, verification and survey
//! - [`config`]: layered configuration

pub mod account;
pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod study;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, InferenceConfig, StudyConfig};

// Error Types
pub use types::error::{
    AccountError, ErrorCategory, InferenceError, Result, ResultExt, StudyError,
};

// =============================================================================
// Feature Re-exports
// =============================================================================

pub use ai::{
    CredentialPool, GenerationParams, HttpTransport, InferenceClient, InferenceRequest,
    InferenceTransport, RotationPolicy, SharedTransport,
};

pub use study::{StudyAssistant, VideoResult, WorksheetContent, WorksheetQuestion};

pub use account::{AccountService, JsonFileStore, MemoryUserStore, UserPreferences, UserStore};
