//! Theme preference persistence.

use crate::domain::{Result, Theme};
use crate::infrastructure::KeyValueStore;

/// Storage key holding the theme name.
pub const THEME_KEY: &str = "tco-theme";

/// Reads and writes the light/dark preference.
pub struct ThemeStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> ThemeStore<S> {
    #[must_use]
    pub const fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Stored theme; missing or unknown values mean dark.
    ///
    /// # Errors
    /// Returns error if the storage backend fails.
    pub fn load(&self) -> Result<Theme> {
        Ok(self
            .kv
            .get_item(THEME_KEY)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    /// Persists the theme.
    ///
    /// # Errors
    /// Returns error if the storage backend fails.
    pub fn save(&self, theme: Theme) -> Result<()> {
        self.kv.set_item(THEME_KEY, theme.as_str())?;
        tracing::debug!(%theme, "Theme saved");
        Ok(())
    }

    /// Switches to the other theme and returns it.
    ///
    /// # Errors
    /// Returns error if the storage backend fails.
    pub fn toggle(&self) -> Result<Theme> {
        let next = self.load()?.toggled();
        self.save(next)?;
        Ok(next)
    }
}
