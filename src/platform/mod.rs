//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Input events (edge detection, hold windows, scripted input)
//! - Time/ticks (fixed-step accumulation, FPS)
//!
//! Storage lives in `persistence`.

pub mod input;
pub mod time;

pub use input::{Autopilot, InputState, Key, KeyHold, KeySample};
pub use time::{FpsCounter, FrameClock};
