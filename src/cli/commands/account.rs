//! Account Command
//!
//! Usage:
//!   studymate account register --name Ada --email ada@example.com --password ...
//!   studymate account verify --email ada@example.com [--code ABC123 | --resend]
//!   studymate account login --email ada@example.com --password ...
//!   studymate account survey --grade 6-8 --subject Math --style Visual --interest Coding
//!   studymate account show [-f json]
//!   studymate account logout

use crate::account::{UserPreferences, survey};
use crate::cli::CommandContext;
use crate::cli::ui::Output;
use crate::types::{AccountError, Result};

pub fn register(name: &str, email: &str, password: &str) -> Result<()> {
    let accounts = CommandContext::load()?.accounts();
    let registration = accounts.register(name, email, password)?;

    let out = Output::new();
    out.success(&format!("Registered {}", registration.profile.email));
    out.info(&format!(
        "Verification code: {}",
        registration.verification_code
    ));
    out.info(&format!(
        "Run 'studymate account verify --email {} --code <CODE>'",
        registration.profile.email
    ));
    Ok(())
}

pub fn verify(email: &str, code: Option<&str>, resend: bool) -> Result<()> {
    let accounts = CommandContext::load()?.accounts();
    let out = Output::new();

    if resend {
        let code = accounts.send_verification(email)?;
        out.info(&format!("New verification code: {}", code));
        return Ok(());
    }

    let code = code.ok_or(AccountError::InvalidCode)?;
    let profile = accounts.verify_email(email, code)?;
    out.success(&format!("Verified {}", profile.email));
    Ok(())
}

pub fn login(email: &str, password: &str) -> Result<()> {
    let accounts = CommandContext::load()?.accounts();
    let profile = accounts.login(email, password)?;

    let out = Output::new();
    out.success(&format!("Welcome back, {}", profile.name));
    if !profile.verified {
        out.warning("Email not verified yet");
    }
    if !profile.has_survey {
        out.info("Tell us how you learn: 'studymate account survey --help'");
    }
    Ok(())
}

pub fn survey(
    grade_level: &str,
    subjects: Vec<String>,
    learning_style: &str,
    interests: Vec<String>,
) -> Result<()> {
    let accounts = CommandContext::load()?.accounts();
    let profile = accounts.update_preferences(UserPreferences {
        grade_level: grade_level.to_string(),
        subjects,
        learning_style: learning_style.to_string(),
        interests,
    })?;

    let out = Output::new();
    out.success("Preferences saved");
    out.profile(&profile);
    Ok(())
}

pub fn show(format: &str) -> Result<()> {
    let accounts = CommandContext::load()?.accounts();
    let profile = accounts.current_user()?.ok_or(AccountError::NotLoggedIn)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&profile)?),
        _ => Output::new().profile(&profile),
    }
    Ok(())
}

pub fn logout() -> Result<()> {
    let accounts = CommandContext::load()?.accounts();
    accounts.logout()?;
    Output::new().success("Logged out");
    Ok(())
}

/// Survey options, for `--help` text
pub fn survey_choices() -> String {
    format!(
        "Grades: {}\nSubjects: {}\nStyles: {}\nInterests: {}",
        survey::GRADE_LEVELS.join(", "),
        survey::SUBJECTS.join(", "),
        survey::LEARNING_STYLES.join(", "),
        survey::INTERESTS.join(", "),
    )
}
