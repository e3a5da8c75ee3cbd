//! Keyboard sampling
//!
//! Hosts report which keys are down once per frame as a [`KeySample`];
//! [`InputState`] turns consecutive samples into just-pressed edges for the
//! simulation.

use std::collections::HashMap;

use crate::sim::{ChargeKey, TickInput};

/// Logical keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Z
    ChargeA,
    /// X
    ChargeB,
    /// R
    Restart,
    /// Esc / Q
    Quit,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::ChargeA, Key::ChargeB, Key::Restart, Key::Quit];
}

/// Keys down during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySample {
    pub charge_a: bool,
    pub charge_b: bool,
    pub restart: bool,
    pub quit: bool,
}

impl KeySample {
    pub fn with(mut self, key: Key) -> Self {
        self.set(key, true);
        self
    }

    pub fn is_down(&self, key: Key) -> bool {
        match key {
            Key::ChargeA => self.charge_a,
            Key::ChargeB => self.charge_b,
            Key::Restart => self.restart,
            Key::Quit => self.quit,
        }
    }

    pub fn set(&mut self, key: Key, down: bool) {
        match key {
            Key::ChargeA => self.charge_a = down,
            Key::ChargeB => self.charge_b = down,
            Key::Restart => self.restart = down,
            Key::Quit => self.quit = down,
        }
    }
}

/// Edge detection against the previous frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    previous: KeySample,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Down now, up last frame
    pub fn just_pressed(&self, current: &KeySample, key: Key) -> bool {
        current.is_down(key) && !self.previous.is_down(key)
    }

    /// Consume this frame's sample and produce the simulation input
    pub fn sample(&mut self, current: KeySample) -> TickInput {
        let input = TickInput {
            charge_a: self.just_pressed(&current, Key::ChargeA),
            charge_b: self.just_pressed(&current, Key::ChargeB),
            restart: self.just_pressed(&current, Key::Restart),
            charge_held: [current.charge_a, current.charge_b],
        };
        self.previous = current;
        input
    }
}

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Covers terminals that never report key releases: OS key
/// repeat is at least 15 Hz, so 6 frames at 60 FPS is always refreshed.
pub const HOLD_WINDOW: u64 = 6;

/// Key-down tracking for hosts that only report press events
#[derive(Debug, Clone, Default)]
pub struct KeyHold {
    last_seen: HashMap<Key, u64>,
    frame: u64,
}

impl KeyHold {
    pub fn new() -> Self {
        Self::default()
    }

    /// A press or repeat event arrived this frame
    pub fn press(&mut self, key: Key) {
        self.last_seen.insert(key, self.frame);
    }

    /// An explicit release event arrived
    pub fn release(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    fn is_held(&self, key: Key) -> bool {
        self.last_seen
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Close the frame and report which keys are down
    pub fn next_frame(&mut self) -> KeySample {
        let mut sample = KeySample::default();
        for key in Key::ALL {
            sample.set(key, self.is_held(key));
        }
        self.frame += 1;
        sample
    }
}

/// Scripted player for demo runs: taps the charge keys alternately, one tap
/// every `period` frames.
#[derive(Debug, Clone)]
pub struct Autopilot {
    period: u64,
    frame: u64,
}

impl Autopilot {
    pub fn new(period: u64) -> Self {
        Self {
            period: period.max(2),
            frame: 0,
        }
    }

    pub fn next_sample(&mut self) -> KeySample {
        let frame = self.frame;
        self.frame += 1;

        if frame % self.period != 0 {
            return KeySample::default();
        }
        let key = if (frame / self.period) % 2 == 0 {
            ChargeKey::A
        } else {
            ChargeKey::B
        };
        match key {
            ChargeKey::A => KeySample::default().with(Key::ChargeA),
            ChargeKey::B => KeySample::default().with(Key::ChargeB),
        }
    }
}
