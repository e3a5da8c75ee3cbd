//! Exhaust smoke particles
//!
//! One puff per tick while the engine burns; puffs fall, swell and fade
//! until they vanish.

use glam::Vec2;
use rand::Rng;

use super::state::Particle;
use crate::tuning::Tuning;

impl Particle {
    /// New puff at the exhaust origin with randomized size and speed
    pub fn spawn<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let (x, y) = tuning.exhaust_origin;
        let (r_min, r_max) = tuning.exhaust_radius;
        let (v_min, v_max) = tuning.exhaust_velocity;
        Self {
            pos: Vec2::new(x, y),
            radius: r_min + rng.random::<f32>() * (r_max - r_min),
            velocity: v_min + rng.random::<f32>() * (v_max - v_min),
            opacity: 1.0,
        }
    }

    /// Fall, grow and fade by one tick
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) {
        self.pos.y += self.velocity * dt;
        self.opacity -= tuning.particle_fade;
        self.radius *= tuning.particle_growth;
    }

    pub fn is_alive(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Advance every particle and drop the ones that faded out
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32, tuning: &Tuning) {
    let mut i = 0;
    while i < particles.len() {
        particles[i].advance(dt, tuning);
        if particles[i].is_alive() {
            i += 1;
        } else {
            particles.remove(i);
        }
    }
}
