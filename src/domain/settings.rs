//! Application configuration models.
//!
//! Credentials, session lifetime, site constants and paths are read from a
//! TOML file; nothing secret is compiled into the binary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Editor credentials and session lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminConfig {
    /// Editor username. Login is refused while unset.
    #[serde(default)]
    pub username: Option<String>,

    /// Editor password, compared verbatim.
    #[serde(default)]
    pub password: Option<String>,

    /// Hours an editor session stays valid.
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

const fn default_session_ttl_hours() -> u32 {
    12
}

impl AdminConfig {
    /// Both credentials, if configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }

    /// Session lifetime as a `chrono::Duration`.
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.session_ttl_hours))
    }
}

/// Public site constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    /// Messaging deep link used for outbound contact actions.
    #[serde(default = "default_contact_link")]
    pub contact_link: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            contact_link: default_contact_link(),
        }
    }
}

fn default_contact_link() -> String {
    "https://wa.me/3777236888".to_string()
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Editor access.
    #[serde(default)]
    pub admin: AdminConfig,

    /// Site constants.
    #[serde(default)]
    pub site: SiteConfig,

    /// Path configuration.
    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".site-content")
    }

    /// Get the local storage database path.
    #[must_use]
    pub fn storage_db_path(&self) -> PathBuf {
        self.data_dir().join("storage.db")
    }
}
