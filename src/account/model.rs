//! Account Records
//!
//! User records as persisted, plus the password-free profile handed to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AccountError, Email};

/// Survey choices offered to learners
pub mod survey {
    pub const GRADE_LEVELS: &[&str] = &["K-2", "3-5", "6-8", "9-12"];
    pub const SUBJECTS: &[&str] = &["Math", "Science", "English", "History", "Art", "Music"];
    pub const LEARNING_STYLES: &[&str] = &["Visual", "Auditory", "Reading/Writing", "Kinesthetic"];
    pub const INTERESTS: &[&str] = &[
        "Technology",
        "Nature",
        "Sports",
        "Music",
        "Art",
        "Reading",
        "Writing",
        "Coding",
    ];
}

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: Email,
    /// `salt$sha256` hex digest
    pub password_hash: String,
    pub verified: bool,
    pub has_survey: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            verified: self.verified,
            has_survey: self.has_survey,
            preferences: self.preferences.clone(),
        }
    }
}

/// User as seen outside the store (no password material)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: Email,
    pub verified: bool,
    pub has_survey: bool,
    pub preferences: Option<UserPreferences>,
}

/// Learning preferences gathered by the survey
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub grade_level: String,
    pub subjects: Vec<String>,
    pub learning_style: String,
    pub interests: Vec<String>,
}

impl UserPreferences {
    /// Canonicalize choices against the survey options and check completeness
    pub fn normalized(self) -> Result<Self, AccountError> {
        let grade_level = canonical_choice("grade level", &self.grade_level, survey::GRADE_LEVELS)?;
        let learning_style =
            canonical_choice("learning style", &self.learning_style, survey::LEARNING_STYLES)?;
        let subjects = canonical_choices("subject", &self.subjects, survey::SUBJECTS)?;
        let interests = canonical_choices("interest", &self.interests, survey::INTERESTS)?;

        Ok(Self {
            grade_level,
            subjects,
            learning_style,
            interests,
        })
    }
}

fn canonical_choice(field: &str, value: &str, options: &[&str]) -> Result<String, AccountError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AccountError::IncompleteSurvey(format!("{} is required", field)));
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(value))
        .map(|o| o.to_string())
        .ok_or_else(|| {
            AccountError::IncompleteSurvey(format!(
                "unknown {} '{}' (choose from: {})",
                field,
                value,
                options.join(", ")
            ))
        })
}

fn canonical_choices(
    field: &str,
    values: &[String],
    options: &[&str],
) -> Result<Vec<String>, AccountError> {
    let mut chosen: Vec<String> = Vec::new();
    for value in values.iter().filter(|v| !v.trim().is_empty()) {
        let choice = canonical_choice(field, value, options)?;
        if !chosen.contains(&choice) {
            chosen.push(choice);
        }
    }
    if chosen.is_empty() {
        return Err(AccountError::IncompleteSurvey(format!(
            "at least one {} is required",
            field
        )));
    }
    Ok(chosen)
}
