//! Audio cues
//!
//! The simulation never touches an audio device. Hosts implement
//! [`AudioSink`] for their engine; [`AudioManager`] is the built-in sink that
//! keeps track of which clips would be playing and logs every cue.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ready / Set / Go step
    Count,
    /// Countdown begins
    CountdownStart,
    /// Spoken countdown number
    Voice(u8),
    /// Engine ignition and burn
    Launch,
    /// Engine cuts out
    PowerDown,
    /// Charge key accepted
    Charge,
    /// Background music
    Music,
}

impl SoundEffect {
    /// Nominal clip length in seconds
    pub fn duration(&self) -> f32 {
        match self {
            SoundEffect::Count => 0.5,
            SoundEffect::CountdownStart => 0.6,
            SoundEffect::Voice(_) => 0.45,
            SoundEffect::Launch => 3.0,
            SoundEffect::PowerDown => 1.2,
            SoundEffect::Charge => 0.15,
            SoundEffect::Music => 96.0,
        }
    }

    pub fn is_music(&self) -> bool {
        matches!(self, SoundEffect::Music)
    }

    /// Clips of the same kind share a slot (all voices are one slot)
    fn same_slot(&self, other: &SoundEffect) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Fire-and-forget playback surface offered by the host engine
pub trait AudioSink {
    /// Play a clip once
    fn play(&mut self, effect: SoundEffect);
    /// Play a clip on repeat until stopped
    fn play_looping(&mut self, effect: SoundEffect);
    /// Whether a clip in the same slot is still sounding
    fn is_playing(&self, effect: SoundEffect) -> bool;
    /// Stop and rewind every clip in the same slot
    fn stop(&mut self, effect: SoundEffect);
    /// Advance playback clocks
    fn update(&mut self, _dt: f32) {}
}

#[derive(Debug, Clone)]
struct ActiveClip {
    effect: SoundEffect,
    /// None while looping
    remaining: Option<f32>,
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    active: Vec<ActiveClip>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Manager with the volumes from the user's settings
    pub fn with_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else if effect.is_music() {
            self.master_volume * self.music_volume
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn start(&mut self, effect: SoundEffect, looping: bool) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        log::debug!(
            "Playing {:?} at volume {:.2}{}",
            effect,
            vol,
            if looping { " (loop)" } else { "" }
        );
        self.active.push(ActiveClip {
            effect,
            remaining: (!looping).then(|| effect.duration()),
        });
    }

    /// Number of clips currently sounding
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        self.start(effect, false);
    }

    fn play_looping(&mut self, effect: SoundEffect) {
        self.start(effect, true);
    }

    fn is_playing(&self, effect: SoundEffect) -> bool {
        self.active.iter().any(|clip| clip.effect.same_slot(&effect))
    }

    fn stop(&mut self, effect: SoundEffect) {
        self.active.retain(|clip| !clip.effect.same_slot(&effect));
    }

    fn update(&mut self, dt: f32) {
        for clip in &mut self.active {
            if let Some(remaining) = clip.remaining.as_mut() {
                *remaining -= dt;
            }
        }
        self.active
            .retain(|clip| clip.remaining.is_none_or(|remaining| remaining > 0.0));
    }
}
