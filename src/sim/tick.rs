//! Fixed timestep simulation tick
//!
//! Advances the intro, countdown, charging and flight deterministically.

use super::particles::update_particles;
use super::state::{ChargeKey, GameEvent, GamePhase, GameState, Particle, ResultStats};
use crate::consts::{CLOUD_SCROLL_SPEED, SCREEN_WIDTH};
use crate::tuning::Tuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Charge key A (Z) went down this tick
    pub charge_a: bool,
    /// Charge key B (X) went down this tick
    pub charge_b: bool,
    /// Restart key went down this tick
    pub restart: bool,
    /// Charge keys currently held, indexed by `ChargeKey::index`
    pub charge_held: [bool; 2],
}

impl TickInput {
    /// A single fresh press of one charge key
    pub fn press(key: ChargeKey) -> Self {
        let mut input = Self::default();
        match key {
            ChargeKey::A => input.charge_a = true,
            ChargeKey::B => input.charge_b = true,
        }
        input.charge_held[key.index()] = true;
        input
    }

    pub fn restart() -> Self {
        Self {
            restart: true,
            ..Default::default()
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    state.time_ticks += 1;

    // Cosmetic timers run in every phase
    state.shake.update(dt, &mut state.rng);
    update_combo_timer(state, dt);
    state.charge_held = input.charge_held;

    if state.phase == GamePhase::GameOver {
        if input.restart {
            restart(state, tuning);
        }
        return;
    }

    state.cloud_offset -= CLOUD_SCROLL_SPEED * dt;
    if state.cloud_offset <= -SCREEN_WIDTH {
        state.cloud_offset = 0.0;
    }

    if input.restart {
        restart(state, tuning);
        return;
    }

    if state.phase == GamePhase::Intro {
        advance_intro(state, tuning, dt);
    }

    if input.charge_a {
        handle_charge_press(state, ChargeKey::A, tuning);
    }
    if input.charge_b {
        handle_charge_press(state, ChargeKey::B, tuning);
    }

    if state.phase == GamePhase::Countdown {
        advance_countdown(state, tuning, dt);
    }

    if state.is_launched() && state.power <= 0.0 && !state.power_depleted {
        state.power_depleted = true;
        state.push_event(GameEvent::PowerDepleted);
    }

    if state.is_powered() {
        let puff = Particle::spawn(&mut state.rng, tuning);
        state.particles.push(puff);
    }
    update_particles(&mut state.particles, dt, tuning);

    if state.is_launched() {
        integrate_flight(state, tuning, dt);
    }
}

/// Apply a charge press. Returns false when charging isn't open.
pub fn handle_charge_press(state: &mut GameState, key: ChargeKey, tuning: &Tuning) -> bool {
    if state.phase != GamePhase::Countdown {
        return false;
    }

    let chained =
        state.combo_timer > 0.0 && state.last_combo_key.is_some_and(|last| last != key);
    state.combo = if chained { state.combo + 1 } else { 1 };
    state.last_combo_key = Some(key);
    state.combo_timer = tuning.combo_timeout;

    let added = tuning.power_gain(state.combo);
    state.power = (state.power + added).min(tuning.power_max);
    state.total_fuel += added;
    state.tap_count += 1;
    state.max_combo = state.max_combo.max(state.combo);

    state.push_event(GameEvent::Charge {
        combo: state.combo,
        power: state.power,
    });
    true
}

/// Count the combo window down; an expired window breaks the chain
fn update_combo_timer(state: &mut GameState, dt: f32) {
    if state.combo_timer > 0.0 {
        state.combo_timer -= dt;
        if state.combo_timer <= 0.0 {
            state.combo_timer = 0.0;
            state.combo = 0;
            state.last_combo_key = None;
        }
    }
}

fn advance_intro(state: &mut GameState, tuning: &Tuning, dt: f32) {
    if !state.intro_done(tuning) {
        state.intro_timer += dt;
        if state.intro_timer >= tuning.intro_step_secs {
            state.intro_timer = 0.0;
            state.intro_step += 1;
            state.push_event(GameEvent::IntroStep(state.intro_step));
        }
    }

    if state.intro_done(tuning) {
        begin_countdown(state);
    }
}

/// Open the charge window; run counters start from zero here
fn begin_countdown(state: &mut GameState) {
    state.phase = GamePhase::Countdown;
    state.countdown_timer = 0.0;
    state.prep_duration = 0.0;
    state.tap_count = 0;
    state.max_combo = 0;
    state.combo = 0;
    state.combo_timer = 0.0;
    state.last_combo_key = None;
    state.total_fuel = 0.0;

    state.push_event(GameEvent::CountdownStarted);
    state.push_event(GameEvent::CountdownVoice(state.countdown));
}

fn advance_countdown(state: &mut GameState, tuning: &Tuning, dt: f32) {
    state.prep_duration += dt;

    if state.countdown > 0 {
        state.countdown_timer += dt;
        if state.countdown_timer >= tuning.countdown_tick_secs {
            state.countdown_timer = 0.0;
            state.countdown -= 1;
            state.push_event(GameEvent::CountdownVoice(state.countdown));
        }
    }

    if state.countdown == 0 {
        launch(state, tuning);
    }
}

fn launch(state: &mut GameState, tuning: &Tuning) {
    state.phase = GamePhase::Launched;
    state.power_depleted = false;
    state.run_duration = 0.0;
    state.peak_speed = 0.0;
    state.combo = 0;
    state.combo_timer = 0.0;
    state.last_combo_key = None;
    state
        .shake
        .start(tuning.launch_shake_duration, tuning.launch_shake_magnitude);

    log::debug!("Launch with {:.1} power", state.power);
    state.push_event(GameEvent::Launched);
}

/// Thrust or freefall, then move the rocket and check for touchdown
fn integrate_flight(state: &mut GameState, tuning: &Tuning, dt: f32) {
    state.run_duration += dt;

    if state.power > 0.0 {
        state.speed = (state.speed + tuning.thrust_accel * dt).min(tuning.speed_max);
        state.power = (state.power - tuning.power_drain * dt).max(0.0);
    } else if state.speed > tuning.gravity && state.altitude > tuning.ground {
        state.speed = (state.speed - tuning.freefall_decel * dt).max(tuning.gravity);
    }
    state.peak_speed = state.peak_speed.max(state.speed);

    // Speed is meters per tick
    state.altitude = (state.altitude + state.speed).clamp(tuning.ground, tuning.ceiling);
    state.highscore = state.highscore.max(state.altitude);

    if state.power_depleted && state.altitude <= tuning.ground {
        finalize_run(state, tuning);
    }
}

/// Snapshot the run, park the rocket and confirm a new record
fn finalize_run(state: &mut GameState, tuning: &Tuning) {
    let average_tps = if state.prep_duration > 0.0 {
        state.tap_count as f32 / state.prep_duration
    } else {
        0.0
    };
    let result = ResultStats {
        altitude: state.highscore,
        peak_speed: state.peak_speed,
        duration: state.run_duration,
        prep_duration: state.prep_duration,
        tap_count: state.tap_count,
        max_combo: state.max_combo,
        average_tps,
        fuel_collected: state.total_fuel,
    };

    state.altitude = tuning.ground;
    state.speed = 0.0;
    state.power = 0.0;
    state.power_depleted = false;
    state.combo = 0;
    state.combo_timer = 0.0;
    state.phase = GamePhase::GameOver;
    state.last_result = Some(result);
    state.push_event(GameEvent::Landed(result));

    if state.highscore > state.saved_highscore {
        state.saved_highscore = state.highscore;
        state.new_record = true;
        state.push_event(GameEvent::NewHighscore(state.highscore));
    }
}

/// Back to the intro. Keeps the persisted best, the previous result and the
/// RNG stream so replays stay reproducible.
pub fn restart(state: &mut GameState, tuning: &Tuning) {
    let rng = state.rng.clone();
    let time_ticks = state.time_ticks;
    let last_result = state.last_result.take();
    let pending = state.drain_events();

    *state = GameState::new(state.seed, tuning).with_saved_highscore(state.saved_highscore);
    state.rng = rng;
    state.time_ticks = time_ticks;
    state.last_result = last_result;
    for event in pending {
        state.push_event(event);
    }
    state.push_event(GameEvent::Restarted);
}
