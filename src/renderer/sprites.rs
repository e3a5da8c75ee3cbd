//! Sprite sheets and frame lookup
//!
//! Frames are laid out left to right in each sheet; the tables below map a
//! phase/count index to the source rectangle a host should blit.

use glam::Vec2;

/// Images the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Background,
    Clouds,
    /// Highscore marker band
    Record,
    Player,
    /// Ready / Set / Go sheet
    ReadySetGo,
    /// 0-10 countdown sheet
    Countdown,
    ZButton,
    XButton,
    /// Soft circle used for exhaust puffs
    Smoke,
}

impl Sprite {
    /// Asset path relative to the assets directory
    pub fn asset_path(&self) -> &'static str {
        match self {
            Sprite::Background => "background.png",
            Sprite::Clouds => "clouds.png",
            Sprite::Record => "record.png",
            Sprite::Player => "player.png",
            Sprite::ReadySetGo => "ready_set_go.png",
            Sprite::Countdown => "countdown.png",
            Sprite::ZButton => "zbutton.png",
            Sprite::XButton => "xbutton.png",
            Sprite::Smoke => "smoke.png",
        }
    }

    /// Drawn size of one frame (logical px)
    pub fn frame_size(&self) -> Vec2 {
        match self {
            Sprite::Background => Vec2::new(480.0, 6403.0),
            Sprite::Clouds => Vec2::new(480.0, 120.0),
            Sprite::Record => Vec2::new(480.0, 80.0),
            Sprite::Player => Vec2::new(90.0, 250.0),
            Sprite::ReadySetGo => Vec2::new(READY_SET_GO_W as f32, SHEET_FRAME_H as f32),
            Sprite::Countdown => Vec2::new(COUNTDOWN_W as f32, SHEET_FRAME_H as f32),
            Sprite::ZButton | Sprite::XButton => Vec2::new(BUTTON_SIZE as f32, BUTTON_SIZE as f32),
            Sprite::Smoke => Vec2::new(64.0, 64.0),
        }
    }
}

/// Source rectangle inside a sheet (px)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRegion {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl SpriteRegion {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Frame number within a horizontal strip
    pub fn frame_index(&self) -> u32 {
        if self.w == 0 { 0 } else { self.x / self.w }
    }
}

const READY_SET_GO_W: u32 = 303;
const COUNTDOWN_W: u32 = 159;
const SHEET_FRAME_H: u32 = 118;
const SHEET_TOP: u32 = 4;
const BUTTON_SIZE: u32 = 135;
const BUTTON_TOP: u32 = 2;

/// Ready / Set / Go frame for an intro step
pub fn ready_set_go_frame(step: u8) -> SpriteRegion {
    SpriteRegion::new(step as u32 * READY_SET_GO_W, SHEET_TOP, READY_SET_GO_W, SHEET_FRAME_H)
}

/// Countdown digit frame
pub fn countdown_frame(count: u8) -> SpriteRegion {
    SpriteRegion::new(count as u32 * COUNTDOWN_W, SHEET_TOP, COUNTDOWN_W, SHEET_FRAME_H)
}

/// Up/down frame for a charge button
pub fn button_frame(held: bool) -> SpriteRegion {
    SpriteRegion::new(held as u32 * BUTTON_SIZE, BUTTON_TOP, BUTTON_SIZE, BUTTON_SIZE)
}
