//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (cosmetic jitter never feeds back into flight)
//! - No rendering, audio or platform dependencies; hosts react to `GameEvent`s

pub mod particles;
pub mod shake;
pub mod state;
pub mod tick;

pub use particles::update_particles;
pub use shake::ScreenShake;
pub use state::{ChargeKey, GameEvent, GamePhase, GameState, Particle, ResultStats};
pub use tick::{TickInput, handle_charge_press, restart, tick};
