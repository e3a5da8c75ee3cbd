//! Rocket Launch - an arcade rocket-launch game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (phases, charging, flight, effects)
//! - `renderer`: Display-list scene building and the terminal host
//! - `platform`: Input sampling and frame timing
//! - `persistence`: JSON save/load with atomic replace
//! - `tuning`: Data-driven game balance

pub mod app;
pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use app::App;
pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical screen size the art is laid out for
    pub const SCREEN_WIDTH: f32 = 480.0;
    pub const SCREEN_HEIGHT: f32 = 640.0;

    /// Background image offset (px) at which the rocket sits on the pad
    pub const GROUND_IMAGE_OFFSET: f32 = 5763.0;
    /// Altitude above ground (m) where the background art ends
    pub const ALTITUDE_CEILING: f32 = 5763.0;

    /// Cloud layer scroll speed (px/s)
    pub const CLOUD_SCROLL_SPEED: f32 = 30.0;
}

/// Convert an altitude (meters above ground) into the background image's
/// vertical offset on screen.
#[inline]
pub fn background_offset(altitude: f32) -> f32 {
    altitude - consts::GROUND_IMAGE_OFFSET
}
