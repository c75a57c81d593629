use log::{info, warn};

use crate::error::Result;
use crate::storage::LocalStorage;
use crate::types::Theme;

pub const THEME_KEY: &str = "theme";

/// Theme preference: read once when opened, written on every change.
#[derive(Debug)]
pub struct ThemeStore {
    storage: LocalStorage,
    current: Theme,
}

impl ThemeStore {
    pub fn open(storage: LocalStorage) -> Result<Self> {
        let current = match storage.get(THEME_KEY)?.as_deref() {
            Some("dark") => Theme::Dark,
            Some("light") | None => Theme::Light,
            Some(other) => {
                warn!("Unknown stored theme '{}', using light", other);
                Theme::Light
            }
        };
        Ok(Self { storage, current })
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn set(&mut self, theme: Theme) -> Result<Theme> {
        self.storage.set(THEME_KEY, theme.as_str())?;
        self.current = theme;
        info!("Theme set to {}", theme.as_str());
        Ok(theme)
    }

    pub fn toggle(&mut self) -> Result<Theme> {
        self.set(self.current.toggled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_light_and_persists_changes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let mut store = ThemeStore::open(storage.clone()).unwrap();
        assert_eq!(store.current(), Theme::Light);

        assert_eq!(store.toggle().unwrap(), Theme::Dark);
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let reopened = ThemeStore::open(storage).unwrap();
        assert_eq!(reopened.current(), Theme::Dark);
    }

    #[test]
    fn unknown_value_falls_back_to_light() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.set(THEME_KEY, "sepia").unwrap();

        assert_eq!(ThemeStore::open(storage).unwrap().current(), Theme::Light);
    }
}
