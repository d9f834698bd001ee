//! Account persistence
//!
//! The whole account state is small, so stores load and save it as one
//! snapshot. `JsonFileStore` writes through a temp file and rename.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::User;
use crate::types::{Email, Result, ResultExt, StudyError};

/// Snapshot of every account-related record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreData {
    pub users: BTreeMap<Email, User>,
    /// Outstanding verification codes by email
    pub pending_codes: BTreeMap<Email, String>,
    pub current_user: Option<Email>,
}

pub trait UserStore: Send + Sync {
    fn load(&self) -> Result<StoreData>;

    fn save(&self, data: &StoreData) -> Result<()>;

    fn load_users(&self) -> Result<BTreeMap<Email, User>> {
        Ok(self.load()?.users)
    }

    fn save_users(&self, users: BTreeMap<Email, User>) -> Result<()> {
        let mut data = self.load()?;
        data.users = users;
        self.save(&data)
    }

    fn find_user(&self, email: &Email) -> Result<Option<User>> {
        Ok(self.load()?.users.get(email).cloned())
    }

    fn save_code(&self, email: &Email, code: &str) -> Result<()> {
        let mut data = self.load()?;
        data.pending_codes.insert(email.clone(), code.to_string());
        self.save(&data)
    }

    fn get_code(&self, email: &Email) -> Result<Option<String>> {
        Ok(self.load()?.pending_codes.get(email).cloned())
    }

    fn remove_code(&self, email: &Email) -> Result<()> {
        let mut data = self.load()?;
        if data.pending_codes.remove(email).is_some() {
            self.save(&data)?;
        }
        Ok(())
    }

    fn current_user(&self) -> Result<Option<User>> {
        let data = self.load()?;
        Ok(data
            .current_user
            .as_ref()
            .and_then(|email| data.users.get(email))
            .cloned())
    }

    fn set_current_user(&self, email: &Email) -> Result<()> {
        let mut data = self.load()?;
        data.current_user = Some(email.clone());
        self.save(&data)
    }

    fn clear_current_user(&self) -> Result<()> {
        let mut data = self.load()?;
        data.current_user = None;
        self.save(&data)
    }
}

/// In-process store, used by tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    data: Mutex<StoreData>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryUserStore {
    fn load(&self) -> Result<StoreData> {
        self.data
            .lock()
            .map(|d| d.clone())
            .map_err(|_| StudyError::Storage("account store lock poisoned".to_string()))
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        let mut guard = self
            .data
            .lock()
            .map_err(|_| StudyError::Storage("account store lock poisoned".to_string()))?;
        *guard = data.clone();
        Ok(())
    }
}

/// Store backed by a single JSON document
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UserStore for JsonFileStore {
    fn load(&self) -> Result<StoreData> {
        if !self.path.exists() {
            return Ok(StoreData::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(format!("reading {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(StoreData::default());
        }
        serde_json::from_str(&raw)
            .with_context(format!("parsing {}", self.path.display()))
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(format!("replacing {}", self.path.display()))?;

        debug!(path = %self.path.display(), users = data.users.len(), "Saved account store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn user(email: &str) -> User {
        User {
            name: "Test Learner".to_string(),
            email: Email::new(email),
            password_hash: "salt$hash".to_string(),
            verified: false,
            has_survey: false,
            preferences: None,
            created_at: Utc::now(),
        }
    }

    fn sample() -> StoreData {
        let mut data = StoreData::default();
        let u = user("kid@school.org");
        data.current_user = Some(u.email.clone());
        data.users.insert(u.email.clone(), u);
        data
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryUserStore::new();
        assert_eq!(store.load().unwrap(), StoreData::default());

        store.save(&sample()).unwrap();
        let current = store.current_user().unwrap().unwrap();
        assert_eq!(current.email.as_str(), "kid@school.org");
    }

    #[test]
    fn test_code_and_session_helpers() {
        let store = MemoryUserStore::new();
        let email = Email::new("kid@school.org");

        store.save_code(&email, "AB12CD").unwrap();
        assert_eq!(store.get_code(&email).unwrap().as_deref(), Some("AB12CD"));
        store.remove_code(&email).unwrap();
        assert!(store.get_code(&email).unwrap().is_none());

        store.save_users(sample().users).unwrap();
        store.set_current_user(&email).unwrap();
        assert!(store.current_user().unwrap().is_some());
        store.clear_current_user().unwrap();
        assert!(store.current_user().unwrap().is_none());
        assert_eq!(store.load_users().unwrap().len(), 1);
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/accounts.json"));
        assert_eq!(store.path(), dir.path().join("nested/accounts.json"));
        assert!(store.load().unwrap().users.is_empty());
        assert!(store.find_user(&Email::new("x@y.z")).unwrap().is_none());
    }

    #[test]
    fn test_json_store_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/accounts.json");

        JsonFileStore::new(&path).save(&sample()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = JsonFileStore::new(&path);
        let found = reopened.find_user(&Email::new("KID@school.org")).unwrap();
        assert_eq!(found.unwrap().name, "Test Learner");
    }

    #[test]
    fn test_json_store_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StudyError::Storage(_)));
    }
}
