//! Game settings and preferences
//!
//! Read from a JSON file next to the game (or `$ROCKET_LAUNCH_SETTINGS`).
//! Every field is optional; anything left out keeps its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence;
use crate::tuning::Tuning;

/// Environment variable overriding the settings file location
pub const SETTINGS_ENV: &str = "ROCKET_LAUNCH_SETTINGS";
const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake on launch
    pub screen_shake: bool,
    /// Exhaust smoke
    pub particles: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Loop background music
    pub music: bool,
    /// Silence every clip
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    // === Runs ===
    /// Where the best altitude is stored
    pub highscore_path: PathBuf,
    /// Fixed RNG seed; random per launch when unset
    pub seed: Option<u64>,
    /// Game balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Visual effects - all on by default
            screen_shake: true,
            particles: true,

            // HUD
            show_fps: false,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            music: true,
            muted: false,

            // Accessibility
            reduced_motion: false,

            highscore_path: PathBuf::from("highscore.json"),
            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Settings file location
    pub fn default_path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    /// Load settings, using defaults if the file is absent or invalid
    pub fn load(path: &Path) -> Self {
        match persistence::load_json::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to read settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp volumes into range and drop unusable tuning
    fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.tuning = self.tuning.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{ChargeKey, GameState, TickInput, tick};
    use std::fs;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"seed": 42, "master_volume": 3.0, "tuning": {"speed_max": 25.0}}"#,
        )
        .unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.tuning.speed_max, 25.0);
        assert_eq!(settings.tuning.power_max, 900.0);
        assert!(settings.particles);
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "[1, 2").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_unusable_tuning_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"tuning": {"ground": 10.0, "ceiling": 5.0, "power_max": -10.0, "gravity": -30.0}}"#,
        )
        .unwrap();

        let settings = Settings::load(&path);
        let tuning = &settings.tuning;
        let defaults = Tuning::default();
        assert_eq!(tuning.ground, defaults.ground);
        assert_eq!(tuning.ceiling, defaults.ceiling);
        assert_eq!(tuning.power_max, defaults.power_max);
        assert_eq!(tuning.gravity, -30.0);

        // A whole charged flight runs within bounds
        let mut state = GameState::new(3, tuning);
        let mut presses = 0u64;
        for _ in 0..60 * 600 {
            presses += 1;
            let input = match presses % 8 {
                0 => TickInput::press(ChargeKey::A),
                4 => TickInput::press(ChargeKey::B),
                _ => TickInput::default(),
            };
            tick(&mut state, &input, tuning, SIM_DT);
            assert!(state.power >= 0.0 && state.power <= tuning.power_max);
            assert!(state.altitude >= tuning.ground && state.altitude <= tuning.ceiling);
            if state.is_game_over() {
                break;
            }
        }
        assert!(state.is_game_over());
    }
}
