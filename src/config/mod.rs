//! Configuration module for Translator-RS
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::info;

/// Global settings instance
static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "TRANSLATOR_SETTINGS_PATH";

/// Install the process-wide settings. Fails if they are already set.
pub fn init(settings: Settings) -> Result<&'static Settings> {
    SETTINGS
        .set(settings)
        .map_err(|_| anyhow::anyhow!("Settings already initialized"))?;
    get().ok_or_else(|| anyhow::anyhow!("Settings not initialized"))
}

/// Get the global settings, if initialized
pub fn get() -> Option<&'static Settings> {
    SETTINGS.get()
}

/// Locate and load settings, falling back to defaults.
///
/// Search order: `$TRANSLATOR_SETTINGS_PATH`, `settings.yml`,
/// `config/settings.yml`, then the user config directory.
pub fn load() -> Result<Settings> {
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return load_from(&path);
        }
    }

    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("translator-rs/settings.yml"));
    }

    for path in paths.iter() {
        if path.exists() {
            return load_from(path);
        }
    }

    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    settings.validate();
    Ok(settings)
}

/// Load, env-merge and validate one settings file
pub fn load_from(path: &Path) -> Result<Settings> {
    info!("Loading settings from: {}", path.display());
    let mut settings = Settings::from_file(path)?;
    settings.merge_env();
    settings.validate();
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_settings_install_once() {
        let mut settings = Settings::default();
        settings.query.default_target_language = "ja".to_string();

        let installed = init(settings).unwrap();
        assert_eq!(installed.query.default_target_language, "ja");
        assert_eq!(get().unwrap().query.default_target_language, "ja");

        assert!(init(Settings::default()).is_err());
        assert_eq!(get().unwrap().query.default_target_language, "ja");
    }

    #[test]
    fn test_load_from_file_validates() {
        let path = std::env::temp_dir().join(format!("translator-rs-{}.yml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "query:\n  default_target_language: klingon\n").unwrap();

        let settings = load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.query.default_target_language, "auto");
    }
}
