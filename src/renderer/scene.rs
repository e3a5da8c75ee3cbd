//! Frame display list
//!
//! Turns the game state into draw commands in logical 480x640 screen space.
//! Text positions are the left end of the baseline.

use glam::Vec2;

use super::TextMetrics;
use super::sprites::{self, Sprite, SpriteRegion};
use crate::background_offset;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::settings::Settings;
use crate::sim::{ChargeKey, GamePhase, GameState, ResultStats};

/// 8-bit RGBA
pub type Rgba = [u8; 4];

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const WHITE: Rgba = [255, 255, 255, 255];
    pub const BLACK: Rgba = [0, 0, 0, 255];
    pub const HIGHSCORE_LABEL: Rgba = [9, 27, 162, 127];
    pub const METER_BACK: Rgba = [0, 0, 0, 180];
    pub const POWER_FILL: Rgba = [255, 165, 0, 255];
    pub const COMBO_FILL: Rgba = [255, 94, 0, 255];
    pub const DIM_OVERLAY: Rgba = [0, 0, 0, 160];
    pub const PANEL: Rgba = [18, 22, 36, 230];
}

/// One drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Blit a sprite (or one frame of a sheet) with its top-left at `pos`
    Image {
        sprite: Sprite,
        region: Option<SpriteRegion>,
        pos: Vec2,
    },
    /// Filled rectangle
    Rect { pos: Vec2, size: Vec2, color: Rgba },
    /// Tinted smoke circle
    Circle { center: Vec2, radius: f32, color: Rgba },
    /// Text, optionally with an outline
    Text {
        text: String,
        pos: Vec2,
        color: Rgba,
        outline: Option<Rgba>,
    },
}

// Layout (logical px)
const CLOUDS_Y: f32 = 5740.0;
const RECORD_Y: f32 = 6015.0;
const RECORD_LABEL_Y: f32 = 6080.0;
const PLAYER_POS: Vec2 = Vec2::new(195.0, 300.0);
const SHEET_Y: f32 = 130.0;
const HEADLINE_Y: f32 = 80.0;
const Z_BUTTON_POS: Vec2 = Vec2::new(280.0, 270.0);
const X_BUTTON_POS: Vec2 = Vec2::new(310.0, 340.0);
const POWER_BAR: Vec2 = Vec2::new(300.0, 20.0);
const POWER_BAR_Y: f32 = 560.0;
const COMBO_BAR: Vec2 = Vec2::new(220.0, 16.0);
const COMBO_BAR_Y: f32 = 520.0;
const PANEL_SIZE: Vec2 = Vec2::new(360.0, 280.0);
const PANEL_Y: f32 = 150.0;
const PANEL_LINE: f32 = 36.0;

fn image(sprite: Sprite, region: Option<SpriteRegion>, pos: Vec2) -> DrawCmd {
    DrawCmd::Image { sprite, region, pos }
}

fn rect(pos: Vec2, size: Vec2, color: Rgba) -> DrawCmd {
    DrawCmd::Rect { pos, size, color }
}

fn text(text: impl Into<String>, pos: Vec2, color: Rgba, outline: Option<Rgba>) -> DrawCmd {
    DrawCmd::Text {
        text: text.into(),
        pos,
        color,
        outline,
    }
}

fn outlined(s: impl Into<String>, pos: Vec2) -> DrawCmd {
    text(s, pos, colors::WHITE, Some(colors::BLACK))
}

/// X that centers `s` on the screen
fn centered_x(s: &str, metrics: &dyn TextMetrics) -> f32 {
    ((SCREEN_WIDTH - metrics.text_width(s)) / 2.0).round()
}

/// Build the full frame
pub fn build_scene(
    state: &GameState,
    settings: &Settings,
    metrics: &dyn TextMetrics,
) -> Vec<DrawCmd> {
    let tuning = &settings.tuning;
    let shake = if settings.effective_screen_shake() {
        state.shake.offset
    } else {
        Vec2::ZERO
    };
    // Text snaps to whole pixels
    let text_shake = shake.round();
    let bg_y = background_offset(state.altitude);

    let mut cmds = Vec::with_capacity(32 + state.particles.len());

    // World layers scroll with altitude
    cmds.push(image(Sprite::Background, None, Vec2::new(shake.x, bg_y + shake.y)));
    let cloud_width = Sprite::Clouds.frame_size().x;
    for tile in 0..2 {
        cmds.push(image(
            Sprite::Clouds,
            None,
            Vec2::new(
                state.cloud_offset + tile as f32 * cloud_width + shake.x,
                bg_y + CLOUDS_Y + shake.y,
            ),
        ));
    }

    let best = state.saved_highscore;
    cmds.push(image(Sprite::Record, None, Vec2::new(shake.x, bg_y + RECORD_Y - best + shake.y)));
    let best_label = format!("{:.0}m", best);
    cmds.push(text(
        best_label.as_str(),
        Vec2::new(
            centered_x(&best_label, metrics) + text_shake.x,
            (bg_y + RECORD_LABEL_Y - best + shake.y).floor(),
        ),
        colors::HIGHSCORE_LABEL,
        None,
    ));

    if settings.particles {
        for p in &state.particles {
            let alpha = (p.opacity.clamp(0.0, 1.0) * 255.0) as u8;
            cmds.push(DrawCmd::Circle {
                center: p.pos + shake,
                radius: p.radius,
                color: [255, 255, 255, alpha],
            });
        }
    }

    cmds.push(image(Sprite::Player, None, PLAYER_POS + shake));

    let sheet_x = ((SCREEN_WIDTH - Sprite::ReadySetGo.frame_size().x) / 2.0).floor();
    cmds.push(image(
        Sprite::ReadySetGo,
        Some(sprites::ready_set_go_frame(state.intro_step)),
        Vec2::new(sheet_x, SHEET_Y) + shake,
    ));
    if state.intro_done(tuning) {
        let count_x = ((SCREEN_WIDTH - Sprite::Countdown.frame_size().x) / 2.0).floor() - 5.0;
        cmds.push(image(
            Sprite::Countdown,
            Some(sprites::countdown_frame(state.countdown)),
            Vec2::new(count_x, SHEET_Y) + shake,
        ));
    }

    // Headline
    if state.is_launched() {
        let label = format!("{:.0}m", state.altitude.abs());
        let x = centered_x(&label, metrics);
        cmds.push(outlined(label, Vec2::new(x, HEADLINE_Y) + text_shake));
    } else if state.phase == GamePhase::Countdown {
        cmds.push(outlined("Charge Your Rocket!", Vec2::new(60.0, HEADLINE_Y) + text_shake));
        cmds.push(image(
            Sprite::ZButton,
            Some(sprites::button_frame(state.charge_held[ChargeKey::A.index()])),
            Z_BUTTON_POS + shake,
        ));
        cmds.push(image(
            Sprite::XButton,
            Some(sprites::button_frame(state.charge_held[ChargeKey::B.index()])),
            X_BUTTON_POS + shake,
        ));
    }

    if (state.intro_done(tuning) && !state.power_depleted) || state.is_launched() {
        push_power_meter(&mut cmds, state, tuning.power_max, shake, text_shake, metrics);
    }

    if state.phase == GamePhase::Countdown && state.combo > 0 {
        push_combo_meter(&mut cmds, state, tuning.combo_timeout, shake, text_shake);
    }

    if state.is_game_over() {
        push_result_panel(&mut cmds, state);
    }

    cmds
}

fn push_power_meter(
    cmds: &mut Vec<DrawCmd>,
    state: &GameState,
    power_max: f32,
    shake: Vec2,
    text_shake: Vec2,
    metrics: &dyn TextMetrics,
) {
    let origin = Vec2::new((SCREEN_WIDTH - POWER_BAR.x) / 2.0, POWER_BAR_Y);
    cmds.push(rect(origin + shake, POWER_BAR, colors::METER_BACK));

    if power_max <= 0.0 {
        return;
    }
    let percent = (state.power / power_max).clamp(0.0, 1.0);
    let fill = Vec2::new((POWER_BAR.x - 4.0) * percent, POWER_BAR.y - 4.0);
    cmds.push(rect(origin + Vec2::splat(2.0) + shake, fill, colors::POWER_FILL));

    let label = format!("Fuel {:3.0}%", percent * 100.0);
    let label_x = (origin.x + (POWER_BAR.x - metrics.text_width(&label)) / 2.0).floor();
    let label_y = origin.y + POWER_BAR.y - 4.0;
    cmds.push(outlined(label, Vec2::new(label_x, label_y) + text_shake));
}

fn push_combo_meter(
    cmds: &mut Vec<DrawCmd>,
    state: &GameState,
    combo_timeout: f32,
    shake: Vec2,
    text_shake: Vec2,
) {
    let percent = if combo_timeout > 0.0 {
        (state.combo_timer / combo_timeout).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let origin = Vec2::new((SCREEN_WIDTH - COMBO_BAR.x) / 2.0, COMBO_BAR_Y);
    cmds.push(rect(
        origin - Vec2::splat(2.0) + shake,
        COMBO_BAR + Vec2::splat(4.0),
        colors::METER_BACK,
    ));
    cmds.push(rect(
        origin + shake,
        Vec2::new(COMBO_BAR.x * percent, COMBO_BAR.y),
        colors::COMBO_FILL,
    ));
    cmds.push(outlined(
        format!("Combo x{}", state.combo),
        Vec2::new(origin.x, origin.y - 10.0) + text_shake,
    ));
    if state.prep_duration > 0.0 {
        let rate = state.tap_count as f32 / state.prep_duration;
        cmds.push(outlined(
            format!("TPS {:.1}", rate),
            Vec2::new(40.0, origin.y + 12.0) + text_shake,
        ));
    }
}

fn push_result_panel(cmds: &mut Vec<DrawCmd>, state: &GameState) {
    cmds.push(rect(
        Vec2::ZERO,
        Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        colors::DIM_OVERLAY,
    ));
    let panel = Vec2::new((SCREEN_WIDTH - PANEL_SIZE.x) / 2.0, PANEL_Y);
    cmds.push(rect(panel, PANEL_SIZE, colors::PANEL));

    let title_y = panel.y + 48.0;
    cmds.push(outlined("Flight Results", Vec2::new(panel.x + 46.0, title_y)));
    let instr_y = title_y + 36.0;
    cmds.push(outlined("Press R to relaunch", Vec2::new(panel.x + 40.0, instr_y)));

    let result = state.last_result.unwrap_or_default();
    let mut line_y = instr_y + 44.0;
    for line in result_lines(&result, state.saved_highscore) {
        cmds.push(text(line, Vec2::new(panel.x + 40.0, line_y), colors::WHITE, None));
        line_y += PANEL_LINE;
    }
}

/// Stat lines shown on the result panel
pub fn result_lines(result: &ResultStats, best: f32) -> Vec<String> {
    vec![
        format!("Altitude: {:.0}m", result.altitude),
        format!("Best: {:.0}m", best),
        format!("Flight Time: {:.1}s", result.duration),
        format!("Prep Time: {:.1}s", result.prep_duration),
        format!("Peak Speed: {:.1}", result.peak_speed),
        format!("Fuel Collected: {:.0}", result.fuel_collected),
        format!("Combo Max: x{}", result.max_combo),
        format!("Taps: {} ({:.1} TPS)", result.tap_count, result.average_tps),
    ]
}

/// Small FPS readout for the top-left corner
pub fn fps_overlay(fps: u32) -> DrawCmd {
    text(format!("{} FPS", fps), Vec2::new(8.0, 24.0), colors::WHITE, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::MonospaceMetrics;
    use crate::sim::{Particle, TickInput, tick};
    use crate::tuning::Tuning;

    fn metrics() -> MonospaceMetrics {
        MonospaceMetrics::new(10.0)
    }

    fn texts(cmds: &[DrawCmd]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn sprites_drawn(cmds: &[DrawCmd]) -> Vec<Sprite> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCmd::Image { sprite, .. } => Some(*sprite),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_intro_scene() {
        let settings = Settings::default();
        let state = GameState::new(1, &settings.tuning);
        let cmds = build_scene(&state, &settings, &metrics());

        let drawn = sprites_drawn(&cmds);
        assert_eq!(drawn[0], Sprite::Background);
        assert!(drawn.contains(&Sprite::ReadySetGo));
        assert!(!drawn.contains(&Sprite::Countdown));
        assert!(!drawn.contains(&Sprite::ZButton));
        assert!(!texts(&cmds).iter().any(|t| t.starts_with("Fuel")));

        // On the pad the background sits at its ground offset
        assert!(matches!(
            cmds[0],
            DrawCmd::Image { pos, .. } if pos == Vec2::new(0.0, -5763.0)
        ));
    }

    #[test]
    fn test_countdown_scene_shows_charge_ui() {
        let settings = Settings::default();
        let mut state = GameState::new(1, &settings.tuning);
        state.intro_step = 3;
        state.phase = GamePhase::Countdown;
        state.countdown = 7;
        state.combo = 3;
        state.combo_timer = 0.35;
        state.tap_count = 12;
        state.prep_duration = 2.0;
        state.power = 450.0;
        state.charge_held = [true, false];

        let cmds = build_scene(&state, &settings, &metrics());
        let labels = texts(&cmds);
        assert!(labels.contains(&"Charge Your Rocket!"));
        assert!(labels.contains(&"Fuel  50%"));
        assert!(labels.contains(&"Combo x3"));
        assert!(labels.contains(&"TPS 6.0"));

        let countdown = cmds.iter().find_map(|c| match c {
            DrawCmd::Image {
                sprite: Sprite::Countdown,
                region,
                ..
            } => *region,
            _ => None,
        });
        assert_eq!(countdown, Some(sprites::countdown_frame(7)));

        let z = cmds.iter().find_map(|c| match c {
            DrawCmd::Image {
                sprite: Sprite::ZButton,
                region,
                ..
            } => *region,
            _ => None,
        });
        assert_eq!(z, Some(sprites::button_frame(true)));
    }

    #[test]
    fn test_power_fill_width() {
        let settings = Settings::default();
        let mut state = GameState::new(1, &settings.tuning);
        state.intro_step = 3;
        state.phase = GamePhase::Countdown;
        state.power = settings.tuning.power_max;

        let cmds = build_scene(&state, &settings, &metrics());
        let fill = cmds.iter().find_map(|c| match c {
            DrawCmd::Rect { size, color, .. } if *color == colors::POWER_FILL => Some(*size),
            _ => None,
        });
        assert_eq!(fill, Some(Vec2::new(296.0, 16.0)));
    }

    #[test]
    fn test_flight_scene_shows_altitude_and_smoke() {
        let settings = Settings::default();
        let mut state = GameState::new(1, &settings.tuning);
        state.intro_step = 3;
        state.phase = GamePhase::Launched;
        state.altitude = 1234.4;
        state.particles.push(Particle {
            pos: Vec2::new(240.0, 560.0),
            radius: 18.0,
            velocity: 110.0,
            opacity: 0.5,
        });

        let cmds = build_scene(&state, &settings, &metrics());
        assert!(texts(&cmds).contains(&"1234m"));
        assert!(cmds.iter().any(|c| matches!(
            c,
            DrawCmd::Circle { color, .. } if color[3] == 127
        )));
        assert!(!sprites_drawn(&cmds).contains(&Sprite::ZButton));

        let no_smoke = Settings {
            particles: false,
            ..Default::default()
        };
        let cmds = build_scene(&state, &no_smoke, &metrics());
        assert!(!cmds.iter().any(|c| matches!(c, DrawCmd::Circle { .. })));
    }

    #[test]
    fn test_reduced_motion_ignores_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let mut state = GameState::new(1, &settings.tuning);
        state.shake.offset = Vec2::new(4.0, -3.0);

        let cmds = build_scene(&state, &settings, &metrics());
        let player = cmds.iter().find_map(|c| match c {
            DrawCmd::Image {
                sprite: Sprite::Player,
                pos,
                ..
            } => Some(*pos),
            _ => None,
        });
        assert_eq!(player, Some(PLAYER_POS));

        let shaky = Settings::default();
        let cmds = build_scene(&state, &shaky, &metrics());
        assert!(cmds.iter().any(|c| matches!(
            c,
            DrawCmd::Image { sprite: Sprite::Player, pos, .. }
                if *pos == PLAYER_POS + Vec2::new(4.0, -3.0)
        )));
    }

    #[test]
    fn test_result_panel_after_landing() {
        let settings = Settings::default();
        let tuning: &Tuning = &settings.tuning;
        let mut state = GameState::new(1, tuning).with_saved_highscore(2000.0);
        // Let the countdown run out with no charge
        for _ in 0..60 * 20 {
            if state.is_game_over() {
                break;
            }
            tick(&mut state, &TickInput::default(), tuning, 1.0 / 60.0);
        }
        assert!(state.is_game_over());

        let cmds = build_scene(&state, &settings, &metrics());
        let labels = texts(&cmds);
        assert!(labels.contains(&"Flight Results"));
        assert!(labels.contains(&"Press R to relaunch"));
        assert!(labels.contains(&"Best: 2000m"));
        assert!(labels.contains(&"Altitude: 0m"));
        assert!(cmds.iter().any(|c| matches!(
            c,
            DrawCmd::Rect { color, .. } if *color == colors::PANEL
        )));
    }

    #[test]
    fn test_result_lines() {
        let result = ResultStats {
            altitude: 4051.6,
            peak_speed: 9.04,
            duration: 26.56,
            prep_duration: 10.0,
            tap_count: 101,
            max_combo: 99,
            average_tps: 10.1,
            fuel_collected: 7800.0,
        };
        let lines = result_lines(&result, 4051.6);
        assert_eq!(lines[0], "Altitude: 4052m");
        assert_eq!(lines[1], "Best: 4052m");
        assert_eq!(lines[2], "Flight Time: 26.6s");
        assert_eq!(lines[6], "Combo Max: x99");
        assert_eq!(lines[7], "Taps: 101 (10.1 TPS)");
    }
}
