//! Player progression persisted between matches
//!
//! Two scalar keys: the highest unlocked difficulty level and whether the
//! tutorial has been completed. Stored in LocalStorage on the web and in
//! memory elsewhere. Missing or malformed values fall back to level 1 and
//! tutorial not completed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::ai::Difficulty;

/// Key/value store holding persisted progression
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

/// In-process store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage (WASM only); silently inert when unavailable
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, progress will not persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to write {key} to LocalStorage");
            }
        }
    }
}

/// Persisted progression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Highest difficulty level the player may pick (1..=5)
    pub unlocked_level: u8,
    pub tutorial_completed: bool,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            unlocked_level: 1,
            tutorial_completed: false,
        }
    }
}

fn read_value<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = storage.get_item(key)?;
    match serde_json::from_str(raw.trim()) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed {key} = {raw:?}: {e}");
            None
        }
    }
}

impl Progress {
    const UNLOCKED_LEVEL_KEY: &'static str = "waterbomb_unlocked_level";
    const TUTORIAL_KEY: &'static str = "waterbomb_tutorial_completed";

    /// Load progression, defaulting anything missing or malformed
    pub fn load(storage: &dyn Storage) -> Self {
        let defaults = Self::default();
        let max_level = Difficulty::WetAndWild.level();
        let unlocked_level = read_value::<u8>(storage, Self::UNLOCKED_LEVEL_KEY)
            .filter(|level| (1..=max_level).contains(level))
            .unwrap_or(defaults.unlocked_level);
        let tutorial_completed =
            read_value::<bool>(storage, Self::TUTORIAL_KEY).unwrap_or(defaults.tutorial_completed);

        log::info!("Loaded progress: level {unlocked_level} unlocked, tutorial completed: {tutorial_completed}");
        Self {
            unlocked_level,
            tutorial_completed,
        }
    }

    pub fn is_unlocked(&self, difficulty: Difficulty) -> bool {
        difficulty.level() <= self.unlocked_level
    }

    /// Unlock the tier above `beaten`, returning it if it was newly unlocked
    pub fn record_win(&mut self, storage: &mut dyn Storage, beaten: Difficulty) -> Option<Difficulty> {
        let next = beaten.next()?;
        if next.level() <= self.unlocked_level {
            return None;
        }
        self.unlocked_level = next.level();
        storage.set_item(Self::UNLOCKED_LEVEL_KEY, &self.unlocked_level.to_string());
        log::info!("Unlocked difficulty {} ({})", next.level(), next.as_str());
        Some(next)
    }

    pub fn complete_tutorial(&mut self, storage: &mut dyn Storage) {
        self.tutorial_completed = true;
        storage.set_item(Self::TUTORIAL_KEY, "true");
        log::info!("Tutorial completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let storage = MemoryStorage::new();
        assert_eq!(Progress::load(&storage), Progress::default());
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let mut storage = MemoryStorage::new();
        storage.set_item("waterbomb_unlocked_level", "lots");
        storage.set_item("waterbomb_tutorial_completed", "yes please");
        assert_eq!(Progress::load(&storage), Progress::default());

        storage.set_item("waterbomb_unlocked_level", "9");
        assert_eq!(Progress::load(&storage).unlocked_level, 1);
        storage.set_item("waterbomb_unlocked_level", "0");
        assert_eq!(Progress::load(&storage).unlocked_level, 1);
    }

    #[test]
    fn test_reads_stored_values() {
        let mut storage = MemoryStorage::new();
        storage.set_item("waterbomb_unlocked_level", "3");
        storage.set_item("waterbomb_tutorial_completed", "true");
        let progress = Progress::load(&storage);
        assert_eq!(progress.unlocked_level, 3);
        assert!(progress.tutorial_completed);
        assert!(progress.is_unlocked(Difficulty::PowerShower));
        assert!(!progress.is_unlocked(Difficulty::SuperSoaker));
    }

    #[test]
    fn test_win_unlocks_next_tier_once() {
        let mut storage = MemoryStorage::new();
        let mut progress = Progress::load(&storage);
        assert_eq!(
            progress.record_win(&mut storage, Difficulty::SplishSplash),
            Some(Difficulty::SprayAndPray)
        );
        assert_eq!(storage.get_item("waterbomb_unlocked_level").as_deref(), Some("2"));
        assert_eq!(progress.record_win(&mut storage, Difficulty::SplishSplash), None);
        assert_eq!(progress.unlocked_level, 2);
        assert_eq!(Progress::load(&storage).unlocked_level, 2);
    }

    #[test]
    fn test_beating_top_tier_unlocks_nothing() {
        let mut storage = MemoryStorage::new();
        let mut progress = Progress {
            unlocked_level: 5,
            tutorial_completed: true,
        };
        assert_eq!(progress.record_win(&mut storage, Difficulty::WetAndWild), None);
        assert!(storage.get_item("waterbomb_unlocked_level").is_none());
    }

    #[test]
    fn test_tutorial_flag_persists() {
        let mut storage = MemoryStorage::new();
        let mut progress = Progress::load(&storage);
        progress.complete_tutorial(&mut storage);
        assert!(Progress::load(&storage).tutorial_completed);
    }
}
