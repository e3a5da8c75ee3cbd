//! Application context
//!
//! [`App`] owns everything a running game needs: the simulation state, the
//! user's settings, the audio sink and the input/timing helpers. Hosts feed
//! it one [`KeySample`] per display frame and draw the scene it returns.

use std::path::PathBuf;

use crate::audio::{AudioSink, SoundEffect};
use crate::consts::SIM_DT;
use crate::highscores::HighScore;
use crate::platform::{FpsCounter, FrameClock, InputState, KeySample};
use crate::renderer::{DrawCmd, TextMetrics, build_scene, scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, ResultStats, TickInput, tick};

/// A running game
pub struct App<A: AudioSink> {
    state: GameState,
    settings: Settings,
    audio: A,
    /// Best altitude on disk
    best: HighScore,
    highscore_path: PathBuf,
    input: InputState,
    clock: FrameClock,
    fps: FpsCounter,
    /// Edges seen on frames that ran no tick yet
    pending: TickInput,
    elapsed: f64,
    quit: bool,
}

impl<A: AudioSink> App<A> {
    /// Load the saved best and start at the intro
    pub fn new(settings: Settings, mut audio: A) -> Self {
        let highscore_path = settings.highscore_path.clone();
        let best = HighScore::load(&highscore_path);
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Game initialized with seed: {}", seed);

        let state = GameState::new(seed, &settings.tuning).with_saved_highscore(best.score);
        if settings.music {
            audio.play_looping(SoundEffect::Music);
        }

        Self {
            state,
            settings,
            audio,
            best,
            highscore_path,
            input: InputState::new(),
            clock: FrameClock::new(),
            fps: FpsCounter::default(),
            pending: TickInput::default(),
            elapsed: 0.0,
            quit: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Stats of the last finished flight
    pub fn last_result(&self) -> Option<ResultStats> {
        self.state.last_result
    }

    /// Quit was pressed
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Advance by `real_dt` seconds of wall time. Runs as many fixed ticks as
    /// the clock pays out.
    pub fn frame(&mut self, keys: KeySample, real_dt: f32) {
        self.elapsed += real_dt as f64;
        self.fps.record(self.elapsed);
        self.collect_input(keys);

        let substeps = self.clock.advance(real_dt);
        for _ in 0..substeps {
            self.run_tick();
        }
        self.audio.update(real_dt);
    }

    /// Advance exactly one fixed tick (headless runs)
    pub fn step(&mut self, keys: KeySample) {
        self.collect_input(keys);
        self.run_tick();
        self.audio.update(SIM_DT);
    }

    /// Display list for the current state
    pub fn scene(&self, metrics: &dyn TextMetrics) -> Vec<DrawCmd> {
        let mut cmds = build_scene(&self.state, &self.settings, metrics);
        if self.settings.show_fps {
            cmds.push(scene::fps_overlay(self.fps.fps()));
        }
        cmds
    }

    fn collect_input(&mut self, keys: KeySample) {
        self.quit |= keys.quit;
        let input = self.input.sample(keys);
        self.pending.charge_a |= input.charge_a;
        self.pending.charge_b |= input.charge_b;
        self.pending.restart |= input.restart;
        self.pending.charge_held = input.charge_held;
    }

    fn run_tick(&mut self) {
        tick(&mut self.state, &self.pending, &self.settings.tuning, SIM_DT);
        // Presses are consumed by the first tick; holds carry over
        self.pending = TickInput {
            charge_held: self.pending.charge_held,
            ..TickInput::default()
        };

        for event in self.state.drain_events() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::IntroStep(_) => self.audio.play(SoundEffect::Count),
            GameEvent::CountdownStarted => self.audio.play(SoundEffect::CountdownStart),
            GameEvent::CountdownVoice(n) => {
                self.audio.stop(SoundEffect::Voice(n));
                self.audio.play(SoundEffect::Voice(n));
            }
            GameEvent::Charge { .. } => self.audio.play(SoundEffect::Charge),
            GameEvent::Launched => {
                if !self.audio.is_playing(SoundEffect::Launch) {
                    self.audio.play(SoundEffect::Launch);
                }
            }
            GameEvent::PowerDepleted => {
                self.audio.stop(SoundEffect::Launch);
                self.audio.play(SoundEffect::PowerDown);
            }
            GameEvent::Landed(result) => {
                log::info!(
                    "Flight over: {:.0}m, peak speed {:.1}, {} taps, best combo x{}",
                    result.altitude,
                    result.peak_speed,
                    result.tap_count,
                    result.max_combo
                );
            }
            GameEvent::NewHighscore(score) => {
                if self.best.submit(score) {
                    // The run keeps its record even if the disk write fails
                    if let Err(e) = self.best.save(&self.highscore_path) {
                        log::warn!("Failed to save highscore: {}", e);
                    }
                }
            }
            GameEvent::Restarted => {
                self.audio.stop(SoundEffect::Launch);
                self.audio.stop(SoundEffect::Voice(0));
                log::debug!("Restarted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioManager;
    use crate::platform::{Autopilot, Key};
    use crate::sim::GamePhase;

    /// Records every cue instead of playing it
    #[derive(Default)]
    struct RecordingSink {
        played: Vec<SoundEffect>,
        stopped: Vec<SoundEffect>,
        /// Clips reported as still sounding
        busy: Vec<SoundEffect>,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, effect: SoundEffect) {
            self.played.push(effect);
        }

        fn play_looping(&mut self, effect: SoundEffect) {
            self.played.push(effect);
        }

        fn is_playing(&self, effect: SoundEffect) -> bool {
            self.busy.contains(&effect)
        }

        fn stop(&mut self, effect: SoundEffect) {
            self.stopped.push(effect);
        }
    }

    fn settings_in(dir: &tempfile::TempDir) -> Settings {
        Settings {
            highscore_path: dir.path().join("highscore.json"),
            seed: Some(11),
            music: false,
            ..Settings::default()
        }
    }

    fn fly<A: AudioSink>(app: &mut App<A>) {
        let mut pilot = Autopilot::new(4);
        for _ in 0..60 * 600 {
            app.step(pilot.next_sample());
            if app.state().is_game_over() {
                return;
            }
        }
        panic!("flight never finished");
    }

    #[test]
    fn test_flight_saves_new_highscore() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(&dir);
        let path = settings.highscore_path.clone();
        let mut app = App::new(settings, AudioManager::new());

        fly(&mut app);

        let result = app.last_result().unwrap();
        assert!(result.altitude > 0.0);
        assert_eq!(HighScore::load(&path).score, result.altitude);
    }

    #[test]
    fn test_saved_best_not_overwritten_by_worse_run() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(&dir);
        HighScore::new(1.0e6).save(&settings.highscore_path).unwrap();
        let path = settings.highscore_path.clone();

        let mut app = App::new(settings, AudioManager::new());
        assert_eq!(app.state().saved_highscore, 1.0e6);
        fly(&mut app);

        assert!(!app.state().new_record);
        assert_eq!(HighScore::load(&path).score, 1.0e6);
    }

    #[test]
    fn test_events_reach_audio() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(settings_in(&dir), RecordingSink::default());
        fly(&mut app);

        let played = &app.audio().played;
        assert_eq!(played.iter().filter(|e| **e == SoundEffect::Count).count(), 3);
        assert_eq!(
            played.iter().filter(|e| **e == SoundEffect::CountdownStart).count(),
            1
        );
        assert!(played.contains(&SoundEffect::Voice(10)));
        assert!(played.contains(&SoundEffect::Charge));
        assert!(played.contains(&SoundEffect::Launch));
        assert!(played.contains(&SoundEffect::PowerDown));
        assert!(app.audio().stopped.contains(&SoundEffect::Launch));
    }

    #[test]
    fn test_launch_clip_not_restarted_while_playing() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RecordingSink {
            busy: vec![SoundEffect::Launch],
            ..RecordingSink::default()
        };
        let mut app = App::new(settings_in(&dir), sink);
        fly(&mut app);

        let played = &app.audio().played;
        assert!(!played.contains(&SoundEffect::Launch));
        assert!(played.contains(&SoundEffect::PowerDown));
    }

    #[test]
    fn test_unwritable_highscore_keeps_record_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        // Parent of the highscore path is a regular file
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let settings = Settings {
            highscore_path: blocker.join("highscore.json"),
            ..settings_in(&dir)
        };
        let mut app = App::new(settings, AudioManager::new());
        fly(&mut app);

        let result = app.last_result().unwrap();
        assert!(result.altitude > 0.0);
        assert!(app.state().new_record);
        assert_eq!(app.state().saved_highscore, result.altitude);
        assert!(!blocker.join("highscore.json").exists());
    }

    #[test]
    fn test_music_starts_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            music: true,
            ..settings_in(&dir)
        };
        let app = App::new(settings, RecordingSink::default());
        assert_eq!(app.audio().played, vec![SoundEffect::Music]);
    }

    #[test]
    fn test_press_between_ticks_is_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(settings_in(&dir), RecordingSink::default());
        while !app.state().counting_started() {
            app.step(KeySample::default());
        }

        // Short frame: no tick yet, the press waits for the next one
        app.frame(KeySample::default().with(Key::ChargeA), SIM_DT * 0.25);
        assert_eq!(app.state().tap_count, 0);
        app.frame(KeySample::default(), SIM_DT);
        assert_eq!(app.state().tap_count, 1);
    }

    #[test]
    fn test_restart_and_quit_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(settings_in(&dir), RecordingSink::default());
        fly(&mut app);
        assert_eq!(app.state().phase, GamePhase::GameOver);

        app.step(KeySample::default().with(Key::Restart));
        assert_eq!(app.state().phase, GamePhase::Intro);
        assert!(app.audio().stopped.contains(&SoundEffect::Voice(0)));
        assert!(!app.should_quit());

        app.step(KeySample::default().with(Key::Quit));
        assert!(app.should_quit());
    }

    #[test]
    fn test_fps_overlay_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = crate::renderer::MonospaceMetrics::new(10.0);
        let plain = App::new(settings_in(&dir), RecordingSink::default());
        let with_fps = App::new(
            Settings {
                show_fps: true,
                ..settings_in(&dir)
            },
            RecordingSink::default(),
        );
        assert_eq!(
            with_fps.scene(&metrics).len(),
            plain.scene(&metrics).len() + 1
        );
    }
}
