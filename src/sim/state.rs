//! Game state and core simulation types
//!
//! Everything a frame needs to simulate or draw lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::shake::ScreenShake;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ready / Set / Go sequence
    Intro,
    /// Counting down to launch; charge presses are accepted
    Countdown,
    /// Rocket in the air (powered ascent, then freefall)
    Launched,
    /// Run ended, result panel shown until restart
    GameOver,
}

/// The two alternating charge inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeKey {
    /// Z key
    A,
    /// X key
    B,
}

impl ChargeKey {
    pub fn index(self) -> usize {
        match self {
            ChargeKey::A => 0,
            ChargeKey::B => 1,
        }
    }
}

/// A smoke puff trailing the rocket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Screen position (px)
    pub pos: Vec2,
    pub radius: f32,
    /// Fall velocity (px/s)
    pub velocity: f32,
    /// 1.0 = opaque, removed at 0
    pub opacity: f32,
}

/// Snapshot of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultStats {
    pub altitude: f32,
    pub peak_speed: f32,
    /// Flight time (s)
    pub duration: f32,
    /// Countdown time spent charging (s)
    pub prep_duration: f32,
    pub tap_count: u32,
    pub max_combo: u32,
    /// Taps per second over the prep window
    pub average_tps: f32,
    pub fuel_collected: f32,
}

/// Things that happened during a tick, for hosts to react to (sound, saves)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Intro advanced to the given step (1-based)
    IntroStep(u8),
    /// Countdown phase entered
    CountdownStarted,
    /// Announce the current countdown value
    CountdownVoice(u8),
    /// A charge press was accepted
    Charge { combo: u32, power: f32 },
    /// Engines lit
    Launched,
    /// Power ran out mid-flight
    PowerDepleted,
    /// Rocket is back on the ground
    Landed(ResultStats),
    /// The persisted best altitude was beaten
    NewHighscore(f32),
    /// State was reset to the intro
    Restarted,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Jitter source for particles and shake
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,

    /// Ready / Set / Go step (0..=intro_steps)
    pub intro_step: u8,
    pub intro_timer: f32,
    /// Current countdown value
    pub countdown: u8,
    pub countdown_timer: f32,

    /// Meters above ground
    pub altitude: f32,
    /// Meters per tick
    pub speed: f32,
    pub power: f32,
    /// Power ran out after launch
    pub power_depleted: bool,

    /// Highest altitude this run
    pub highscore: f32,
    /// Best altitude across runs (persisted)
    pub saved_highscore: f32,
    /// This run beat the saved highscore
    pub new_record: bool,

    pub peak_speed: f32,
    /// Power collected before clamping
    pub total_fuel: f32,
    pub prep_duration: f32,
    pub run_duration: f32,

    pub combo: u32,
    pub combo_timer: f32,
    pub max_combo: u32,
    pub tap_count: u32,
    pub last_combo_key: Option<ChargeKey>,

    /// Charge keys currently held (button sprites)
    pub charge_held: [bool; 2],
    /// Cloud layer horizontal scroll (px)
    pub cloud_offset: f32,
    pub shake: ScreenShake,
    /// Exhaust smoke (visual only)
    pub particles: Vec<Particle>,

    /// Stats of the most recently finished run
    pub last_result: Option<ResultStats>,
    /// Events raised since the host last drained them
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh state at the start of the intro
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Intro,
            intro_step: 0,
            intro_timer: 0.0,
            countdown: tuning.countdown_from,
            countdown_timer: 0.0,
            altitude: tuning.ground,
            speed: 0.0,
            power: 0.0,
            power_depleted: false,
            highscore: 0.0,
            saved_highscore: 0.0,
            new_record: false,
            peak_speed: 0.0,
            total_fuel: 0.0,
            prep_duration: 0.0,
            run_duration: 0.0,
            combo: 0,
            combo_timer: 0.0,
            max_combo: 0,
            tap_count: 0,
            last_combo_key: None,
            charge_held: [false; 2],
            cloud_offset: 0.0,
            shake: ScreenShake::default(),
            particles: Vec::new(),
            last_result: None,
            events: Vec::new(),
        }
    }

    /// Builder-style helper to seed the persisted best altitude
    pub fn with_saved_highscore(mut self, score: f32) -> Self {
        self.saved_highscore = score;
        self
    }

    pub fn is_launched(&self) -> bool {
        self.phase == GamePhase::Launched
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Countdown has begun and the run has not ended yet
    pub fn counting_started(&self) -> bool {
        matches!(self.phase, GamePhase::Countdown | GamePhase::Launched)
    }

    /// Ready / Set / Go finished
    pub fn intro_done(&self, tuning: &Tuning) -> bool {
        self.intro_step >= tuning.intro_steps
    }

    /// Rocket has thrust and is off the pad
    pub fn is_powered(&self) -> bool {
        self.is_launched() && !self.power_depleted
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events raised since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_on_the_pad() {
        let tuning = Tuning::default();
        let state = GameState::new(7, &tuning);
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.countdown, 10);
        assert_eq!(state.altitude, tuning.ground);
        assert_eq!(state.power, 0.0);
        assert!(state.particles.is_empty());
        assert!(state.last_result.is_none());
        assert!(!state.counting_started());
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(7, &Tuning::default());
        state.push_event(GameEvent::Launched);
        state.push_event(GameEvent::PowerDepleted);

        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::Launched, GameEvent::PowerDepleted]);
        assert!(state.drain_events().is_empty());
    }
}
