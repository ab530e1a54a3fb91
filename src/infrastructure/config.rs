//! Configuration file management.
//!
//! Handles loading TOML configuration files and writing the default one.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# site-content configuration
# Auto-generated - edit as needed

[admin]
# Editor credentials. Login is refused until both are set.
# username = "editor"
# password = "change-me"

# Hours an editor session stays valid (default: 12)
session_ttl_hours = 12

[site]
# Messaging deep link used by the contact buttons
contact_link = "https://wa.me/3777236888"

[paths]
# Custom data directory (optional, defaults to ~/.site-content)
# data_dir = "/custom/path"
"#;

/// Load configuration from the given file, or from the default location.
///
/// A missing default file yields the default configuration; a missing
/// explicitly requested file is an error.
///
/// # Errors
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return load_config_from_file(path);
    }

    let config_path = config_file_path();

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Create the commented default configuration file if it doesn't exist.
///
/// Returns `true` when a new file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    // Ensure parent directory exists
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %config_path.display(), "Created default configuration");

    Ok(true)
}

/// Get the path to the default configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    AppConfig::default_data_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[admin]\nusername = \"editor\"\npassword = \"secret\"\nsession_ttl_hours = 2\n\n\
             [paths]\ndata_dir = \"/srv/site\"\n",
        )
        .unwrap();

        let loaded = load_config(Some(&path)).unwrap();

        assert_eq!(loaded.admin.credentials(), Some(("editor", "secret")));
        assert_eq!(loaded.admin.session_ttl_hours, 2);
        assert_eq!(loaded.storage_db_path(), PathBuf::from("/srv/site/storage.db"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_config(Some(&dir.path().join("absent.toml"))),
            Err(AppError::Io { .. })
        ));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[admin]\nusername = \"a\"\npassword = \"b\"\n").unwrap();

        let config = load_config_from_file(&path).unwrap();
        assert_eq!(config.admin.credentials(), Some(("a", "b")));
        assert_eq!(config.admin.session_ttl_hours, 12);
        assert_eq!(config.site, crate::domain::SiteConfig::default());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[admin\n").unwrap();

        assert!(matches!(
            load_config_from_file(&path),
            Err(AppError::Config { .. })
        ));
    }

    #[test]
    fn test_ensure_config_exists_writes_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        assert!(ensure_config_exists(&path).unwrap());
        assert!(!ensure_config_exists(&path).unwrap());
        assert!(load_config_from_file(&path).is_ok());
    }
}
