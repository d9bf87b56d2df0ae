//! Persistent window and display settings.
//!
//! Settings live as JSON in the platform config directory. A missing or
//! malformed file falls back to the defaults.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            window_width: 1280,
            window_height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

impl Settings {
    /// Where the settings file lives, if the platform has a config directory.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("catnap2d").join("settings.json"))
    }

    /// Loads the settings file, falling back to defaults when it is missing
    /// or malformed.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("ignoring malformed {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Writes the settings back to the config directory.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self).expect("settings always serialize");
        fs::write(path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a_windowed_720p_setup() {
        let settings = Settings::default();
        assert_eq!(settings.window_width, 1280);
        assert_eq!(settings.window_height, 720);
        assert!(!settings.fullscreen);
        assert!(settings.vsync);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "fullscreen": true }"#).unwrap();
        assert!(settings.fullscreen);
        assert_eq!(settings.window_width, 1280);
        assert!(settings.vsync);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = Settings {
            window_width: 1920,
            window_height: 1080,
            fullscreen: true,
            vsync: false,
        };
        let text = serde_json::to_string(&settings).unwrap();
        assert_eq!(serde_json::from_str::<Settings>(&text).unwrap(), settings);
    }
}
