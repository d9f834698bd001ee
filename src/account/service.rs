use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use super::model::{User, UserPreferences, UserProfile};
use super::store::UserStore;
use super::validation::{
    code_digest, hash_password, is_valid_email, is_valid_name, is_valid_password,
    verification_code, verify_password,
};
use crate::constants::account as account_constants;
use crate::types::{AccountError, Email, Result};

/// Result of a successful registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub profile: UserProfile,
    pub verification_code: String,
}

/// Account lifecycle: registration, verification, session and survey
pub struct AccountService {
    store: Arc<dyn UserStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, password), fields(email = %email.trim()))]
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<Registration> {
        if !is_valid_name(name) {
            return Err(AccountError::InvalidName {
                min: account_constants::MIN_NAME_LEN,
            }
            .into());
        }
        if !is_valid_email(email) {
            return Err(AccountError::InvalidEmail.into());
        }
        if !is_valid_password(password) {
            return Err(AccountError::InvalidPassword {
                min: account_constants::MIN_PASSWORD_LEN,
            }
            .into());
        }

        let email = Email::new(email);
        let mut users = self.store.load_users()?;
        if users.contains_key(&email) {
            return Err(AccountError::EmailTaken.into());
        }

        let user = User {
            name: name.trim().to_string(),
            email: email.clone(),
            password_hash: hash_password(password)?,
            verified: false,
            has_survey: false,
            preferences: None,
            created_at: Utc::now(),
        };
        let profile = user.profile();
        users.insert(email.clone(), user);
        self.store.save_users(users)?;

        info!("Registered new account");
        let verification_code = self.send_verification(email.as_str())?;

        Ok(Registration {
            profile,
            verification_code,
        })
    }

    /// Issue a fresh code for `email`, replacing any outstanding one
    pub fn send_verification(&self, email: &str) -> Result<String> {
        if !is_valid_email(email) {
            return Err(AccountError::InvalidEmail.into());
        }
        let email = Email::new(email);
        let code = verification_code();
        self.store.save_code(&email, &code_digest(&code))?;

        // No mail transport; the log line is the delivery.
        info!(email = %email, code = %code, "Verification code issued");
        Ok(code)
    }

    #[instrument(skip(self, code))]
    pub fn verify_email(&self, email: &str, code: &str) -> Result<UserProfile> {
        let email = Email::new(email);
        let expected = self.store.get_code(&email)?;
        if expected.as_deref() != Some(code_digest(code).as_str()) {
            warn!("Verification code mismatch");
            return Err(AccountError::InvalidCode.into());
        }

        let mut users = self.store.load_users()?;
        let user = users
            .get_mut(&email)
            .ok_or(AccountError::UserNotFound)?;
        user.verified = true;
        let profile = user.profile();

        self.store.save_users(users)?;
        self.store.remove_code(&email)?;
        info!("Email verified");
        Ok(profile)
    }

    #[instrument(skip(self, password), fields(email = %email.trim()))]
    pub fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        if !is_valid_email(email) || !is_valid_password(password) {
            return Err(AccountError::InvalidLoginFormat.into());
        }

        let email = Email::new(email);
        let user = self
            .store
            .find_user(&email)?
            .filter(|u| verify_password(password, &u.password_hash))
            .ok_or(AccountError::InvalidCredentials)?;

        self.store.set_current_user(&email)?;
        info!(verified = user.verified, "Logged in");
        Ok(user.profile())
    }

    /// Record survey answers for the logged-in user
    pub fn update_preferences(&self, preferences: UserPreferences) -> Result<UserProfile> {
        let current = self
            .store
            .current_user()?
            .ok_or(AccountError::NotLoggedIn)?;
        let preferences = preferences.normalized()?;

        let mut users = self.store.load_users()?;
        let user = users
            .get_mut(&current.email)
            .ok_or(AccountError::UserNotFound)?;
        user.preferences = Some(preferences);
        user.has_survey = true;
        let profile = user.profile();

        self.store.save_users(users)?;
        info!(email = %current.email, "Survey saved");
        Ok(profile)
    }

    pub fn current_user(&self) -> Result<Option<UserProfile>> {
        Ok(self.store.current_user()?.map(|u| u.profile()))
    }

    pub fn logout(&self) -> Result<()> {
        self.store.clear_current_user()?;
        info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryUserStore;
    use crate::account::UserStore;
    use crate::types::StudyError;

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryUserStore::new()))
    }

    fn prefs() -> UserPreferences {
        UserPreferences {
            grade_level: "3-5".to_string(),
            subjects: vec!["Science".to_string()],
            learning_style: "Kinesthetic".to_string(),
            interests: vec!["Nature".to_string()],
        }
    }

    fn message(err: StudyError) -> String {
        err.to_string()
    }

    #[test]
    fn test_register_validation_order_and_messages() {
        let svc = service();
        assert_eq!(
            message(svc.register("A", "bad", "short").unwrap_err()),
            "Name must be at least 2 characters long"
        );
        assert_eq!(
            message(svc.register("Ada", "bad", "short").unwrap_err()),
            "Invalid email format"
        );
        assert_eq!(
            message(svc.register("Ada", "ada@example.com", "short").unwrap_err()),
            "Password must be at least 8 characters long"
        );
    }

    #[test]
    fn test_register_rejects_duplicate_case_insensitively() {
        let svc = service();
        let reg = svc
            .register("Ada", "ada@example.com", "password1")
            .unwrap();
        assert!(!reg.profile.verified);
        assert_eq!(reg.verification_code.len(), 6);

        let err = svc
            .register("Ada Again", "ADA@Example.com", "password2")
            .unwrap_err();
        assert_eq!(message(err), "Email already registered");
    }

    #[test]
    fn test_verify_email_flow() {
        let svc = service();
        let reg = svc
            .register("Ada", "ada@example.com", "password1")
            .unwrap();

        let err = svc.verify_email("ada@example.com", "ZZZZZZ").unwrap_err();
        assert_eq!(message(err), "Invalid verification code");

        let profile = svc
            .verify_email("ada@example.com", &reg.verification_code.to_lowercase())
            .unwrap();
        assert!(profile.verified);

        // Code is single-use
        let err = svc
            .verify_email("ada@example.com", &reg.verification_code)
            .unwrap_err();
        assert_eq!(message(err), "Invalid verification code");
    }

    #[test]
    fn test_store_holds_digests_not_secrets() {
        let store = Arc::new(MemoryUserStore::new());
        let svc = AccountService::new(store.clone());
        let reg = svc
            .register("Ada", "ada@example.com", "password1")
            .unwrap();

        let data = store.load().unwrap();
        let email = Email::new("ada@example.com");
        let stored_code = &data.pending_codes[&email];
        assert_ne!(stored_code, &reg.verification_code);
        assert_eq!(stored_code, &code_digest(&reg.verification_code));

        let user = &data.users[&email];
        assert!(user.password_hash.starts_with("$argon2id$"));
        assert!(!user.password_hash.contains("password1"));
    }

    #[test]
    fn test_verify_unknown_user() {
        let svc = service();
        let code = svc.send_verification("ghost@example.com").unwrap();
        let err = svc.verify_email("ghost@example.com", &code).unwrap_err();
        assert_eq!(message(err), "User not found");
    }

    #[test]
    fn test_resend_replaces_code() {
        let svc = service();
        let reg = svc
            .register("Ada", "ada@example.com", "password1")
            .unwrap();
        let mut fresh = svc.send_verification("ada@example.com").unwrap();
        while fresh == reg.verification_code {
            fresh = svc.send_verification("ada@example.com").unwrap();
        }
        assert!(svc
            .verify_email("ada@example.com", &reg.verification_code)
            .is_err());
        assert!(svc.verify_email("ada@example.com", &fresh).is_ok());
    }

    #[test]
    fn test_login_messages() {
        let svc = service();
        svc.register("Ada", "ada@example.com", "password1")
            .unwrap();

        assert_eq!(
            message(svc.login("not-an-email", "password1").unwrap_err()),
            "Invalid email or password format"
        );
        assert_eq!(
            message(svc.login("ada@example.com", "short").unwrap_err()),
            "Invalid email or password format"
        );
        assert_eq!(
            message(svc.login("ada@example.com", "wrongpass").unwrap_err()),
            "Invalid email or password"
        );
        assert_eq!(
            message(svc.login("nobody@example.com", "password1").unwrap_err()),
            "Invalid email or password"
        );

        let profile = svc.login(" Ada@Example.com ", "password1").unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(svc.current_user().unwrap().unwrap().email, profile.email);
    }

    #[test]
    fn test_update_preferences_requires_login() {
        let svc = service();
        let err = svc.update_preferences(prefs()).unwrap_err();
        assert_eq!(message(err), "No user is logged in");

        svc.register("Ada", "ada@example.com", "password1")
            .unwrap();
        svc.login("ada@example.com", "password1").unwrap();

        let mut incomplete = prefs();
        incomplete.subjects.clear();
        assert!(matches!(
            svc.update_preferences(incomplete),
            Err(StudyError::Account(AccountError::IncompleteSurvey(_)))
        ));

        let profile = svc.update_preferences(prefs()).unwrap();
        assert!(profile.has_survey);
        assert_eq!(profile.preferences.unwrap().learning_style, "Kinesthetic");
    }

    #[test]
    fn test_logout_clears_session() {
        let svc = service();
        svc.register("Ada", "ada@example.com", "password1")
            .unwrap();
        svc.login("ada@example.com", "password1").unwrap();
        svc.logout().unwrap();
        assert!(svc.current_user().unwrap().is_none());
    }
}
