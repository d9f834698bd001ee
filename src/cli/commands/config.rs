//! Config Command
//!
//! Manage StudyMate configuration.
//!
//! Usage:
//!   studymate config show [-g] [-f json]
//!   studymate config path
//!   studymate config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show configuration
pub fn show(global: bool, format: &str) -> Result<()> {
    if !global {
        // Merged effective config
        return ConfigLoader::show_config(format == "json");
    }

    match ConfigLoader::global_config_path() {
        Some(global_path) if global_path.exists() => {
            let content = std::fs::read_to_string(&global_path)?;
            println!("# Global Config: {}\n", global_path.display());
            println!("{}", content);
        }
        Some(_) => {
            println!("No global config found.");
            println!("Run 'studymate config init --global' to create one.");
        }
        None => println!("Cannot determine global config directory."),
    }
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global configuration
pub fn init_global(force: bool) -> Result<()> {
    let dir = ConfigLoader::init_global(force)?;
    let out = Output::new();
    out.success("Initialized global configuration");
    out.field("Directory", &dir.display().to_string());
    if let Some(config_path) = ConfigLoader::global_config_path() {
        out.field("Config", &config_path.display().to_string());
    }
    out.info("Set STUDYMATE_API_KEYS=\"key1,key2\" to provide credentials");
    Ok(())
}

/// Initialize project configuration
pub fn init_project(force: bool) -> Result<()> {
    let dir = ConfigLoader::init_project(force)?;
    let out = Output::new();
    out.success("Initialized project configuration");
    out.field("Directory", &dir.display().to_string());
    out.field(
        "Config",
        &ConfigLoader::project_config_path().display().to_string(),
    );
    Ok(())
}
