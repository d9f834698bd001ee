//! Learner accounts
//!
//! Registration with email verification, a persisted login session and the
//! learning-preferences survey.

mod model;
mod service;
mod store;
mod validation;

pub use model::{User, UserPreferences, UserProfile, survey};
pub use service::{AccountService, Registration};
pub use store::{JsonFileStore, MemoryUserStore, StoreData, UserStore};
pub use validation::{is_valid_email, is_valid_name, is_valid_password};
