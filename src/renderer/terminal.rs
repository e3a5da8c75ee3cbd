//! Terminal host renderer
//!
//! Rasterizes the display list onto a grid of character cells. The logical
//! 480x640 screen is stretched over the whole terminal; sprites become small
//! ASCII pieces and rectangles become cell background tints.

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Attribute, Color, Print},
};
use glam::Vec2;

use super::scene::{DrawCmd, Rgba};
use super::sprites::{Sprite, SpriteRegion};
use super::{MonospaceMetrics, Renderer};
use crate::consts::{ALTITUDE_CEILING, GROUND_IMAGE_OFFSET, SCREEN_HEIGHT, SCREEN_WIDTH};

type Rgb = [u8; 3];

const SKY_LOW: Rgb = [110, 170, 230];
const SKY_HIGH: Rgb = [8, 8, 32];
const GROUND: Rgb = [60, 110, 40];
const CLOUD: Rgb = [235, 235, 245];
const RECORD_LINE: Rgb = [250, 210, 60];
const ROCKET: Rgb = [240, 240, 240];
const SHEET_TEXT: Rgb = [255, 220, 90];

/// Screen y (px) of the launch pad when the rocket is on the ground
const GROUND_LINE_Y: f32 = 580.0;
/// Cloud puffs repeat every this many px
const CLOUD_PERIOD: f32 = 96.0;
const CLOUD_WIDTH: f32 = 40.0;

const ROCKET_ART: [&str; 6] = ["  /\\  ", " |  | ", " |()| ", " |  | ", "/|__|\\", "  ''  "];
const READY_SET_GO_LABELS: [&str; 3] = ["READY", "SET", "GO!"];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
    bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: [255, 255, 255],
            bg: [0, 0, 0],
            bold: false,
        }
    }
}

fn rgb(c: Rgba) -> Rgb {
    [c[0], c[1], c[2]]
}

fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
    }
}

/// Character-cell renderer writing to any terminal stream
pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        let mut renderer = Self {
            out,
            cols: 0,
            rows: 0,
            cells: Vec::new(),
        };
        renderer.resize(cols, rows);
        renderer
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.cells = vec![Cell::default(); self.cols as usize * self.rows as usize];
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Logical size of one cell
    fn cell_size(&self) -> Vec2 {
        Vec2::new(
            SCREEN_WIDTH / self.cols as f32,
            SCREEN_HEIGHT / self.rows as f32,
        )
    }

    /// Text metrics matching this grid
    pub fn metrics(&self) -> MonospaceMetrics {
        MonospaceMetrics::new(self.cell_size().x)
    }

    /// Writer the frames go to
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn to_cell(&self, p: Vec2) -> (i32, i32) {
        let cell = self.cell_size();
        ((p.x / cell.x).floor() as i32, (p.y / cell.y).floor() as i32)
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(idx)
    }

    /// Text of one row, for inspection
    pub fn row_text(&self, row: u16) -> String {
        let start = row as usize * self.cols as usize;
        self.cells[start..start + self.cols as usize]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    fn put_str(&mut self, col: i32, row: i32, s: &str, fg: Rgb, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            if let Some(cell) = self.cell_mut(col + i as i32, row) {
                cell.ch = ch;
                cell.fg = fg;
                cell.bold = bold;
            }
        }
    }

    /// Write `s` centered on a logical point
    fn put_centered(&mut self, center: Vec2, s: &str, fg: Rgb, bold: bool) {
        let (col, row) = self.to_cell(center);
        let half = s.chars().count() as i32 / 2;
        self.put_str(col - half, row, s, fg, bold);
    }

    /// Fill the grid from a display list
    pub fn rasterize(&mut self, scene: &[DrawCmd]) {
        self.cells.fill(Cell::default());
        for cmd in scene {
            match cmd {
                DrawCmd::Image {
                    sprite,
                    region,
                    pos,
                } => self.draw_image(*sprite, *region, *pos),
                DrawCmd::Rect { pos, size, color } => self.fill_rect(*pos, *size, *color),
                DrawCmd::Circle {
                    center,
                    radius: _,
                    color,
                } => self.draw_puff(*center, *color),
                DrawCmd::Text {
                    text,
                    pos,
                    color,
                    outline,
                } => {
                    // Baseline sits at the bottom of the glyph row
                    let (col, row) = self.to_cell(*pos - Vec2::new(0.0, 1.0));
                    self.put_str(col, row, text, rgb(*color), outline.is_some());
                }
            }
        }
    }

    fn draw_image(&mut self, sprite: Sprite, region: Option<SpriteRegion>, pos: Vec2) {
        let size = sprite.frame_size();
        let center = pos + size / 2.0;
        let frame = region.map(|r| r.frame_index()).unwrap_or(0);

        match sprite {
            Sprite::Background => self.draw_sky(pos),
            Sprite::Clouds => self.draw_clouds(pos, size),
            Sprite::Record => {
                let (_, row) = self.to_cell(center);
                for col in 0..self.cols as i32 {
                    if let Some(cell) = self.cell_mut(col, row) {
                        cell.ch = '-';
                        cell.fg = RECORD_LINE;
                    }
                }
            }
            Sprite::Player => {
                let (col, row) = self.to_cell(center);
                let top = row - ROCKET_ART.len() as i32 / 2;
                for (i, line) in ROCKET_ART.iter().enumerate() {
                    let half = line.chars().count() as i32 / 2;
                    self.put_str(col - half, top + i as i32, line, ROCKET, false);
                }
            }
            Sprite::ReadySetGo => {
                if let Some(label) = READY_SET_GO_LABELS.get(frame as usize) {
                    self.put_centered(center, label, SHEET_TEXT, true);
                }
            }
            Sprite::Countdown => {
                self.put_centered(center, &frame.to_string(), SHEET_TEXT, true);
            }
            Sprite::ZButton | Sprite::XButton => {
                let label = if sprite == Sprite::ZButton { "[Z]" } else { "[X]" };
                let (col, row) = self.to_cell(center);
                let held = frame == 1;
                for (i, ch) in label.chars().enumerate() {
                    if let Some(cell) = self.cell_mut(col - 1 + i as i32, row) {
                        cell.ch = ch;
                        cell.bold = held;
                        if held {
                            cell.fg = [0, 0, 0];
                            cell.bg = [255, 255, 255];
                        } else {
                            cell.fg = [255, 255, 255];
                        }
                    }
                }
            }
            Sprite::Smoke => {}
        }
    }

    /// Sky darkens with altitude; the pad shows while near the ground
    fn draw_sky(&mut self, pos: Vec2) {
        let altitude = pos.y + GROUND_IMAGE_OFFSET;
        let sky = lerp_rgb(SKY_LOW, SKY_HIGH, altitude / ALTITUDE_CEILING);
        let ground_y = GROUND_LINE_Y + altitude;
        let cell_h = self.cell_size().y;

        for row in 0..self.rows as i32 {
            let bg = if row as f32 * cell_h >= ground_y { GROUND } else { sky };
            for col in 0..self.cols as i32 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.bg = bg;
                }
            }
        }
    }

    fn draw_clouds(&mut self, pos: Vec2, size: Vec2) {
        let (_, row) = self.to_cell(pos + Vec2::new(0.0, size.y / 2.0));
        let cell_w = self.cell_size().x;
        for col in 0..self.cols as i32 {
            let x = (col as f32 + 0.5) * cell_w;
            if (x - pos.x).rem_euclid(CLOUD_PERIOD) < CLOUD_WIDTH {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = '~';
                    cell.fg = CLOUD;
                }
            }
        }
    }

    fn draw_puff(&mut self, center: Vec2, color: Rgba) {
        let alpha = color[3];
        if alpha == 0 {
            return;
        }
        let ch = match alpha {
            171..=255 => '@',
            86..=170 => 'o',
            _ => '.',
        };
        let (col, row) = self.to_cell(center);
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ch;
            cell.fg = lerp_rgb(cell.bg, rgb(color), alpha as f32 / 255.0);
        }
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let cell = self.cell_size();
        let col0 = (pos.x / cell.x).floor() as i32;
        let row0 = (pos.y / cell.y).floor() as i32;
        let col1 = ((pos.x + size.x) / cell.x).ceil() as i32;
        let row1 = ((pos.y + size.y) / cell.y).ceil() as i32;
        let t = color[3] as f32 / 255.0;
        let tint = rgb(color);

        for row in row0..row1 {
            for col in col0..col1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.bg = lerp_rgb(cell.bg, tint, t);
                    cell.fg = lerp_rgb(cell.fg, tint, t * 0.5);
                }
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut fg = None;
        let mut bg = None;
        let mut bold = false;
        self.out.queue(style::SetAttribute(Attribute::Reset))?;

        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if fg != Some(cell.fg) {
                    self.out.queue(style::SetForegroundColor(to_color(cell.fg)))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    self.out.queue(style::SetBackgroundColor(to_color(cell.bg)))?;
                    bg = Some(cell.bg);
                }
                if bold != cell.bold {
                    let attr = if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    };
                    self.out.queue(style::SetAttribute(attr))?;
                    bold = cell.bold;
                }
                self.out.queue(Print(cell.ch))?;
            }
        }

        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, scene: &[DrawCmd]) -> Result<(), Self::Error> {
        self.rasterize(scene);
        self.flush()
    }
}
