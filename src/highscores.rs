//! Best-altitude record
//!
//! A single `{"score": <meters>}` document, read once at startup and
//! rewritten whenever a run beats it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistError};

/// Persisted best altitude
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HighScore {
    /// Meters above ground
    pub score: f32,
}

impl HighScore {
    pub fn new(score: f32) -> Self {
        Self { score }
    }

    /// Load the record, falling back to zero when absent or unreadable
    pub fn load(path: &Path) -> Self {
        match persistence::load_json::<HighScore>(path) {
            Ok(Some(record)) if record.score.is_finite() => {
                log::info!("Loaded highscore {:.0}m from {}", record.score, path.display());
                record
            }
            Ok(Some(record)) => {
                log::warn!("Ignoring non-finite highscore {} in {}", record.score, path.display());
                Self::default()
            }
            Ok(None) => {
                log::info!("No highscore found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to read highscore from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write the record to disk
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::save_json(path, self)?;
        log::info!("Highscore {:.0}m saved to {}", self.score, path.display());
        Ok(())
    }

    /// Keep the better of the stored score and `altitude`. Returns true if
    /// `altitude` is a new record.
    pub fn submit(&mut self, altitude: f32) -> bool {
        if altitude > self.score {
            self.score = altitude;
            true
        } else {
            false
        }
    }
}
