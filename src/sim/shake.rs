//! Decaying screen shake
//!
//! Purely cosmetic: the offset is applied by the renderer and never feeds
//! back into the simulation.

use glam::Vec2;
use rand::Rng;

/// Timed random offset whose magnitude fades linearly to zero
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenShake {
    /// Seconds left
    pub timer: f32,
    /// Seconds the current shake was started with
    pub duration: f32,
    /// Peak offset (px)
    pub magnitude: f32,
    /// Offset for this frame
    pub offset: Vec2,
}

impl ScreenShake {
    /// Begin a shake, replacing any shake in progress
    pub fn start(&mut self, duration: f32, magnitude: f32) {
        self.duration = duration;
        self.timer = duration;
        self.magnitude = magnitude;
    }

    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }

    /// Advance the timer and pick a new offset
    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        if self.timer <= 0.0 {
            self.offset = Vec2::ZERO;
            return;
        }

        self.timer = (self.timer - dt).max(0.0);
        let progress = if self.duration > 0.0 {
            self.timer / self.duration
        } else {
            0.0
        };
        let intensity = self.magnitude * progress;
        self.offset = Vec2::new(
            rng.random_range(-1.0_f32..=1.0) * intensity,
            rng.random_range(-1.0_f32..=1.0) * intensity,
        );
    }

    /// Stop immediately and clear the offset
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
