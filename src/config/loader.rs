//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/studymate/config.toml)
//! 3. Project config (.studymate/config.toml)
//! 4. Environment variables (STUDYMATE_* prefix, `__` between sections)
//!
//! API keys left empty by every layer fall back to `STUDYMATE_API_KEYS` / `HF_API_KEYS`.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{Result, StudyError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let global = Self::global_config_path();
        Self::load_layers(global.as_deref(), &Self::project_config_path())
    }

    /// Load from explicit global/project files plus the environment
    pub fn load_layers(global: Option<&Path>, project: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        // e.g. STUDYMATE_STUDY__TEMPERATURE -> study.temperature
        figment = figment.merge(Env::prefixed("STUDYMATE_").split("__").lowercase(true));

        Self::finish(figment)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));
        Self::finish(figment)
    }

    fn finish(figment: Figment) -> Result<Config> {
        let mut config: Config = figment
            .extract()
            .map_err(|e| StudyError::Config(format!("Configuration error: {}", e)))?;

        config.inference.api_keys.retain(|k| !k.trim().is_empty());

        // Validate configuration after loading
        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/studymate/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("studymate"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to global data directory (~/.local/share/studymate/)
    pub fn global_data_dir() -> Option<PathBuf> {
        env::var("XDG_DATA_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".local").join("share"))
            })
            .map(|p| p.join("studymate"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".studymate")
    }

    /// Resolve where account data lives
    pub fn account_store_path(config: &Config) -> PathBuf {
        config.account.store_path.clone().unwrap_or_else(|| {
            Self::global_data_dir()
                .unwrap_or_else(Self::project_dir)
                .join("accounts.json")
        })
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:   {} {}", exists, global.display());
        } else {
            println!("  Global:   (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project:  {} {}", exists, project.display());

        if let Some(data) = Self::global_data_dir() {
            let exists = if data.exists() { "✓" } else { "✗" };
            println!("  Data:     {} {}", exists, data.display());
        }
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| StudyError::Config(e.to_string()))?
            );
        }

        println!(
            "# api_keys: {} configured",
            config.inference.api_keys.len()
        );

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            StudyError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_config(&global_dir, Self::default_global_config(), force)?;
        Ok(global_dir)
    }

    /// Initialize project configuration
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let project_dir = Self::project_dir();
        Self::write_config(&project_dir, Self::default_project_config(), force)?;
        Ok(project_dir)
    }

    fn write_config(dir: &Path, content: String, force: bool) -> Result<()> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, content)?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }
        Ok(())
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Generate default global config content (TOML)
    fn default_global_config() -> String {
        format!(
            r#"# StudyMate Global Configuration
# User-wide defaults. Project settings in .studymate/config.toml override these.

version = "1.0"

[inference]
endpoint = "{}"
# Bearer tokens tried in turn. Prefer STUDYMATE_API_KEYS="key1,key2" over storing them here.
api_keys = []
# "sticky" starts at the last key that worked, "in-order" always starts at the first
rotation = "sticky"
retry_delay_ms = {}
timeout_secs = {}
"#,
            crate::constants::inference::DEFAULT_ENDPOINT,
            crate::constants::inference::MODEL_LOADING_RETRY_DELAY_MS,
            crate::constants::inference::DEFAULT_TIMEOUT_SECS,
        )
    }

    /// Generate default project config content (TOML)
    fn default_project_config() -> String {
        r#"# StudyMate Project Configuration
# Settings that override global defaults for this directory.

version = "1.0"

[study]
worksheet_question_count = 5
worksheet_max_length = 800
video_max_length = 500
chat_max_length = 500
temperature = 0.7
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RotationPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            ConfigLoader::load_layers(None, &temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.study.worksheet_max_length, 800);
    }

    #[test]
    fn test_project_overrides_global() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        let project = temp_dir.path().join("project.toml");

        fs::write(
            &global,
            "[inference]\napi_keys = [\"g1\", \"\", \"g2\"]\nrotation = \"in-order\"\n[study]\nchat_max_length = 300\n",
        )
        .unwrap();
        fs::write(&project, "[study]\nchat_max_length = 200\n").unwrap();

        let config = ConfigLoader::load_layers(Some(&global), &project).unwrap();

        assert_eq!(config.study.chat_max_length, 200);
        assert_eq!(config.inference.api_keys, vec!["g1", "g2"]);
        assert_eq!(config.inference.rotation, RotationPolicy::InOrder);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[study]\ntemperature = 9.0\n").unwrap();

        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(matches!(err, StudyError::Config(_)));
    }

    #[test]
    fn test_env_override() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("STUDYMATE_INFERENCE__RETRY_DELAY_MS", "5");
            jail.set_env("STUDYMATE_INFERENCE__TIMEOUT_SECS", "9");

            let config = ConfigLoader::load_layers(None, &jail.directory().join("none.toml"))
                .map_err(|e| e.to_string())?;

            assert_eq!(config.inference.retry_delay_ms, 5);
            assert_eq!(config.inference.timeout_secs, 9);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_project_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("project.toml", "[study]\nvideo_max_length = 200\n")?;
            jail.set_env("STUDYMATE_STUDY__VIDEO_MAX_LENGTH", "42");

            let config = ConfigLoader::load_layers(None, &jail.directory().join("project.toml"))
                .map_err(|e| e.to_string())?;

            assert_eq!(config.study.video_max_length, 42);
            Ok(())
        });
    }

    #[test]
    fn test_default_templates_parse() {
        let temp_dir = TempDir::new().unwrap();
        let global = temp_dir.path().join("global.toml");
        let project = temp_dir.path().join("project.toml");
        fs::write(&global, ConfigLoader::default_global_config()).unwrap();
        fs::write(&project, ConfigLoader::default_project_config()).unwrap();

        assert!(ConfigLoader::load_from_file(&global).is_ok());
        assert!(ConfigLoader::load_from_file(&project).is_ok());
    }

    #[test]
    fn test_account_store_path_override() {
        let mut config = Config::default();
        config.account.store_path = Some(PathBuf::from("/tmp/users.json"));
        assert_eq!(
            ConfigLoader::account_store_path(&config),
            PathBuf::from("/tmp/users.json")
        );
    }
}
