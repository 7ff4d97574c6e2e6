//! Game settings and preferences
//!
//! Persisted through the key/value store alongside level progress.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys, load_data, save_data};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self { music_volume: 1.0 }
    }
}

impl Settings {
    /// Load settings from the store, defaults for anything missing
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        let settings = Self {
            music_volume: load_data(store, keys::MUSIC_VOLUME, defaults.music_volume).clamp(0.0, 1.0),
        };
        log::info!("Loaded settings: music volume {:.2}", settings.music_volume);
        settings
    }

    /// Persist every setting
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        save_data(store, keys::MUSIC_VOLUME, self.music_volume);
        log::info!("Settings saved");
    }

    /// Slider moved: clamp, store, and save immediately
    pub fn set_music_volume(&mut self, store: &mut dyn KeyValueStore, volume: f32) {
        self.music_volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            self.music_volume
        };
        save_data(store, keys::MUSIC_VOLUME, self.music_volume);
    }

    /// Music should (re)start whenever volume is above zero
    pub fn music_audible(&self) -> bool {
        self.music_volume > 0.0
    }

    /// Volume as shown next to the slider, e.g. `"75%"`
    pub fn music_volume_label(&self) -> String {
        format!("{:.0}%", self.music_volume * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_store_is_empty() {
        let store = MemoryStore::default();
        let settings = Settings::load(&store);
        assert_eq!(settings.music_volume, 1.0);
        assert_eq!(settings.music_volume_label(), "100%");
    }

    #[test]
    fn test_volume_change_persists_clamped() {
        let mut store = MemoryStore::default();
        let mut settings = Settings::load(&store);
        settings.set_music_volume(&mut store, 1.7);
        assert_eq!(settings.music_volume, 1.0);
        settings.set_music_volume(&mut store, 0.35);
        assert_eq!(Settings::load(&store).music_volume, 0.35);
        assert_eq!(settings.music_volume_label(), "35%");
    }

    #[test]
    fn test_zero_volume_is_silent() {
        let mut store = MemoryStore::default();
        let mut settings = Settings::default();
        settings.set_music_volume(&mut store, 0.0);
        assert!(!settings.music_audible());
    }
}
