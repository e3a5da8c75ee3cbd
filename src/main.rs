//! Rocket Launch entry point
//!
//! Runs the game in the terminal, or with `--demo` flies one headless
//! autopilot launch and prints the results as JSON.

use std::io::{self, BufWriter, Stdout, Write, stdout};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand, cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
};

use rocket_launch::App;
use rocket_launch::audio::AudioManager;
use rocket_launch::platform::{Autopilot, Key, KeyHold};
use rocket_launch::renderer::{Renderer, TerminalRenderer};
use rocket_launch::settings::Settings;

const FRAME: Duration = Duration::from_micros(16_667);

/// Frames between autopilot taps in demo mode (15 taps/s)
const DEMO_TAP_PERIOD: u64 = 4;
/// Give up on a demo flight after this many ticks
const DEMO_MAX_TICKS: u64 = 60 * 600;

fn main() -> io::Result<()> {
    env_logger::init();
    log::info!("Rocket Launch starting...");

    let settings = Settings::load(&Settings::default_path());
    let audio = AudioManager::with_settings(&settings);
    let app = App::new(settings, audio);

    if std::env::args().skip(1).any(|arg| arg == "--demo") {
        run_demo(app)
    } else {
        run_terminal(app)
    }
}

// ── Headless demo ────────────────────────────────────────────────────────────

fn run_demo(mut app: App<AudioManager>) -> io::Result<()> {
    let mut pilot = Autopilot::new(DEMO_TAP_PERIOD);
    for _ in 0..DEMO_MAX_TICKS {
        app.step(pilot.next_sample());
        if app.state().is_game_over() {
            break;
        }
    }

    match app.last_result() {
        Some(result) => {
            let json = serde_json::to_string_pretty(&result).map_err(io::Error::other)?;
            println!("{}", json);
            Ok(())
        }
        None => {
            log::error!("Demo flight did not land within {} ticks", DEMO_MAX_TICKS);
            Err(io::Error::other("demo flight did not finish"))
        }
    }
}

// ── Terminal host ────────────────────────────────────────────────────────────

fn key_for(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Key::ChargeA),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(Key::ChargeB),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Key::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Key::Quit),
        _ => None,
    }
}

fn run_terminal(app: App<AudioManager>) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = TerminalRenderer::new(BufWriter::new(stdout()), cols, rows);

    terminal::enable_raw_mode()?;
    let out = renderer.writer_mut();
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events where the terminal supports them; KeyHold covers the rest
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the loop never waits on I/O
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(app, &mut renderer, &rx);

    // Always restore the terminal
    let out = renderer.writer_mut();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
    result
}

fn game_loop(
    mut app: App<AudioManager>,
    renderer: &mut TerminalRenderer<BufWriter<Stdout>>,
    rx: &mpsc::Receiver<Event>,
) -> io::Result<()> {
    let mut keys = KeyHold::new();
    let mut last = Instant::now();

    while !app.should_quit() {
        let frame_start = Instant::now();

        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c'),
                    modifiers,
                    ..
                }) if modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                Event::Key(KeyEvent { code, kind, .. }) => {
                    if let Some(key) = key_for(code) {
                        match kind {
                            KeyEventKind::Press | KeyEventKind::Repeat => keys.press(key),
                            KeyEventKind::Release => keys.release(key),
                        }
                    }
                }
                Event::Resize(cols, rows) => renderer.resize(cols, rows),
                _ => {}
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        app.frame(keys.next_frame(), dt);

        let metrics = renderer.metrics();
        renderer.render(&app.scene(&metrics))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }

    if let Some(result) = app.last_result() {
        log::info!("Last flight reached {:.0}m", result.altitude);
    }
    Ok(())
}
