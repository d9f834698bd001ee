//! Input validation and password digests for accounts

use std::sync::LazyLock;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::Rng;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::constants::account as account_constants;
use crate::types::{Result, StudyError};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= account_constants::MIN_NAME_LEN
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= account_constants::MIN_PASSWORD_LEN
}

/// Argon2id PHC string (`$argon2id$v=19$...`) with a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; account_constants::SALT_LEN];
    rand::rng().fill(&mut salt);
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| StudyError::Storage(format!("Invalid password salt: {}", e)))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StudyError::Storage(format!("Password hashing failed: {}", e)))
}

/// False for a wrong password and for anything that is not a PHC string
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Uppercase alphanumeric verification code
pub fn verification_code() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(account_constants::VERIFICATION_CODE_LEN)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

/// SHA-256 hex of a normalized (trimmed, uppercased) code; only this is stored
pub fn code_digest(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.trim().to_uppercase().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("learner@school.edu"));
        assert!(is_valid_email("  a.b+c@d.co "));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spa ce@x.io"));
    }

    #[test]
    fn test_name_and_password_rules() {
        assert!(is_valid_name("Al"));
        assert!(!is_valid_name(" A "));
        assert!(is_valid_password("12345678"));
        assert!(!is_valid_password("1234567"));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let stored = hash_password("correct horse").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
        assert!(!stored.contains("correct horse"));
        assert_ne!(stored, hash_password("correct horse").unwrap());
    }

    #[test]
    fn test_verify_rejects_non_phc_hashes() {
        assert!(!verify_password("correct horse", "garbage"));
        assert!(!verify_password("correct horse", ""));
        // legacy `salt$sha256hex` layout is not accepted
        assert!(!verify_password(
            "correct horse",
            "00112233445566778899aabbccddeeff$0123456789abcdef"
        ));
    }

    #[test]
    fn test_code_digest_is_lowercase_sha256_hex() {
        let digest = code_digest(" ab12cd ");
        assert_eq!(digest, code_digest("AB12CD"));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(
            code_digest("abc"),
            "b5d4045c3f466fa91fe2cc6abe79232a1a57cdf104f7a26e716e0a1e2789df78"
        );
        assert_ne!(digest, code_digest("AB12CE"));
    }

    #[test]
    fn test_verification_code_shape() {
        let code = verification_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
