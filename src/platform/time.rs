//! Frame timing
//!
//! Real frame time is banked in an accumulator and paid out as fixed
//! simulation steps.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame we'll try to catch up on
const MAX_FRAME_DT: f32 = 0.1;

/// Fixed-step accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank `dt` seconds of real time and return how many fixed steps to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop what we couldn't simulate instead of spiralling
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Unsimulated time carried into the next frame
    pub fn leftover(&self) -> f32 {
        self.accumulator
    }
}

/// Rolling frames-per-second over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame at `time` seconds
    pub fn record(&mut self, time: f64) {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one we'll overwrite next
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                self.fps = ((self.frame_times.len() - 1) as f64 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_step_per_display_frame() {
        let mut clock = FrameClock::new();
        let mut total = 0;
        for _ in 0..60 {
            total += clock.advance(1.0 / 60.0);
        }
        assert!((59..=60).contains(&total));
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
        assert!(clock.leftover() < SIM_DT);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(5.0), MAX_SUBSTEPS);
        assert!(clock.leftover() <= SIM_DT);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        for i in 1..=120 {
            fps.record(i as f64 / 30.0);
        }
        assert_eq!(fps.fps(), 30);
    }
}
