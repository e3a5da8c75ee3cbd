//! Data-driven game balance
//!
//! Every number that shapes how a run feels lives here so it can be
//! overridden from the settings file without a rebuild.

use serde::{Deserialize, Serialize};

use crate::consts::ALTITUDE_CEILING;

/// Charge, flight and effect constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Charging ===
    /// Power meter capacity
    pub power_max: f32,
    /// Power added by every charge press
    pub base_power_gain: f32,
    /// Extra power per combo step beyond the first
    pub combo_bonus: f32,
    /// Seconds an alternating press may follow the previous one
    pub combo_timeout: f32,

    // === Sequencing ===
    /// Ready / Set / Go steps before the countdown
    pub intro_steps: u8,
    /// Seconds per intro step
    pub intro_step_secs: f32,
    /// Countdown start value
    pub countdown_from: u8,
    /// Seconds per countdown tick
    pub countdown_tick_secs: f32,

    // === Flight ===
    /// Speed cap (m per tick)
    pub speed_max: f32,
    /// Freefall speed floor (negative)
    pub gravity: f32,
    /// Speed gained per second while powered
    pub thrust_accel: f32,
    /// Power burned per second while powered
    pub power_drain: f32,
    /// Speed lost per second once power is gone
    pub freefall_decel: f32,
    /// Ground altitude
    pub ground: f32,
    /// Highest reachable altitude
    pub ceiling: f32,

    // === Effects ===
    /// Screen shake on launch (seconds, px)
    pub launch_shake_duration: f32,
    pub launch_shake_magnitude: f32,
    /// Exhaust emission point (screen px)
    pub exhaust_origin: (f32, f32),
    /// Exhaust particle radius range (px)
    pub exhaust_radius: (f32, f32),
    /// Exhaust particle fall velocity range (px/s)
    pub exhaust_velocity: (f32, f32),
    /// Per-tick radius growth factor
    pub particle_growth: f32,
    /// Per-tick opacity loss
    pub particle_fade: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            power_max: 900.0,
            base_power_gain: 5.0,
            combo_bonus: 1.5,
            combo_timeout: 0.35,

            intro_steps: 3,
            intro_step_secs: 1.0,
            countdown_from: 10,
            countdown_tick_secs: 1.0,

            speed_max: 20.0,
            gravity: -40.0,
            thrust_accel: 0.6,
            power_drain: 60.0,
            freefall_decel: 2.4,
            ground: 0.0,
            ceiling: ALTITUDE_CEILING,

            launch_shake_duration: 0.6,
            launch_shake_magnitude: 6.0,
            exhaust_origin: (240.0, 550.0),
            exhaust_radius: (16.0, 22.0),
            exhaust_velocity: (100.0, 130.0),
            particle_growth: 1.01,
            particle_fade: 0.015,
        }
    }
}

/// Reset `value` to `default` unless it is finite and passes `ok`
fn check(name: &str, value: &mut f32, default: f32, ok: impl Fn(f32) -> bool) {
    if !(value.is_finite() && ok(*value)) {
        log::warn!("Invalid tuning {} = {}, using {}", name, value, default);
        *value = default;
    }
}

/// Reset a (min, max) range that is empty or non-finite
fn check_range(name: &str, range: &mut (f32, f32), default: (f32, f32)) {
    let (lo, hi) = *range;
    if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi) {
        log::warn!("Invalid tuning {} = {:?}, using {:?}", name, range, default);
        *range = default;
    }
}

impl Tuning {
    /// Power gained by a press at the given combo count (1 = no chain)
    pub fn power_gain(&self, combo: u32) -> f32 {
        self.base_power_gain + combo.saturating_sub(1) as f32 * self.combo_bonus
    }

    /// Replace values the simulation can't run with by their defaults
    pub fn sanitized(mut self) -> Self {
        let d = Tuning::default();
        let non_negative = |v: f32| v >= 0.0;
        let positive = |v: f32| v > 0.0;

        check("power_max", &mut self.power_max, d.power_max, non_negative);
        check("base_power_gain", &mut self.base_power_gain, d.base_power_gain, non_negative);
        check("combo_bonus", &mut self.combo_bonus, d.combo_bonus, non_negative);
        check("combo_timeout", &mut self.combo_timeout, d.combo_timeout, non_negative);
        check("intro_step_secs", &mut self.intro_step_secs, d.intro_step_secs, non_negative);
        check(
            "countdown_tick_secs",
            &mut self.countdown_tick_secs,
            d.countdown_tick_secs,
            non_negative,
        );

        check("speed_max", &mut self.speed_max, d.speed_max, non_negative);
        check("gravity", &mut self.gravity, d.gravity, |v| v <= 0.0);
        check("thrust_accel", &mut self.thrust_accel, d.thrust_accel, non_negative);
        // Both have to be positive or a flight never ends
        check("power_drain", &mut self.power_drain, d.power_drain, positive);
        check("freefall_decel", &mut self.freefall_decel, d.freefall_decel, positive);
        if !(self.ground.is_finite() && self.ceiling.is_finite() && self.ground <= self.ceiling) {
            log::warn!(
                "Invalid tuning ground {} / ceiling {}, using {} / {}",
                self.ground,
                self.ceiling,
                d.ground,
                d.ceiling
            );
            self.ground = d.ground;
            self.ceiling = d.ceiling;
        }

        check(
            "launch_shake_duration",
            &mut self.launch_shake_duration,
            d.launch_shake_duration,
            non_negative,
        );
        check(
            "launch_shake_magnitude",
            &mut self.launch_shake_magnitude,
            d.launch_shake_magnitude,
            non_negative,
        );
        if !(self.exhaust_origin.0.is_finite() && self.exhaust_origin.1.is_finite()) {
            log::warn!("Invalid tuning exhaust_origin {:?}", self.exhaust_origin);
            self.exhaust_origin = d.exhaust_origin;
        }
        check_range("exhaust_radius", &mut self.exhaust_radius, d.exhaust_radius);
        check_range("exhaust_velocity", &mut self.exhaust_velocity, d.exhaust_velocity);
        check("particle_growth", &mut self.particle_growth, d.particle_growth, positive);
        // Puffs that never fade would pile up forever
        check("particle_fade", &mut self.particle_fade, d.particle_fade, positive);
        self
    }
}
