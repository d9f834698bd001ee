//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Inference endpoint constants
pub mod inference {
    /// Default hosted text-generation endpoint
    pub const DEFAULT_ENDPOINT: &str =
        "https://api-inference.huggingface.co/models/tiiuae/falcon-7b-instruct";

    /// Delay before retrying a credential that reported "model loading" (milliseconds)
    pub const MODEL_LOADING_RETRY_DELAY_MS: u64 = 1000;

    /// Same-credential retries after a "model loading" response
    pub const MODEL_LOADING_RETRIES: usize = 1;

    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Environment variables consulted for a comma separated credential list
    pub const API_KEYS_ENV: &[&str] = &["STUDYMATE_API_KEYS", "HF_API_KEYS"];
}

/// Study feature constants
pub mod study {
    /// Questions requested per worksheet
    pub const WORKSHEET_QUESTION_COUNT: usize = 5;

    /// Generation length for worksheets
    pub const WORKSHEET_MAX_LENGTH: u32 = 800;

    /// Generation length for video suggestions
    pub const VIDEO_MAX_LENGTH: u32 = 500;

    /// Generation length for chat replies
    pub const CHAT_MAX_LENGTH: u32 = 500;

    /// Sampling temperature shared by all study features
    pub const TEMPERATURE: f32 = 0.7;

    /// Video suggestions requested per search
    pub const VIDEO_SUGGESTION_COUNT: usize = 3;

    /// Maximum length of a normalized video identifier
    pub const VIDEO_ID_LEN: usize = 11;

    /// Identifier used by the canned video result
    pub const FALLBACK_VIDEO_ID: &str = "dQw4w9WgXcQ";

    /// Reply used when the model returns nothing
    pub const CHAT_APOLOGY: &str =
        "I apologize, but I could not generate a response. Please try again.";
}

/// Account constants
pub mod account {
    /// Minimum characters in a display name
    pub const MIN_NAME_LEN: usize = 2;

    /// Minimum characters in a password
    pub const MIN_PASSWORD_LEN: usize = 8;

    /// Length of an email verification code
    pub const VERIFICATION_CODE_LEN: usize = 6;

    /// Salt bytes prepended to password digests
    pub const SALT_LEN: usize = 16;
}
