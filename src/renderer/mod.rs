//! Rendering module
//!
//! The game describes each frame as a display list ([`DrawCmd`]s) built from
//! an immutable view of the state. Hosts implement [`Renderer`] to put that
//! list on screen; the terminal host ships with the crate.

pub mod scene;
pub mod sprites;
pub mod terminal;

pub use scene::{DrawCmd, Rgba, build_scene, colors, result_lines};
pub use sprites::{Sprite, SpriteRegion};
pub use terminal::TerminalRenderer;

/// Draws a finished display list
pub trait Renderer {
    type Error;

    fn render(&mut self, scene: &[DrawCmd]) -> Result<(), Self::Error>;
}

/// Text measurement offered by the host's font stack
pub trait TextMetrics {
    /// Advance width of `text` in logical pixels
    fn text_width(&self, text: &str) -> f32;
}

/// Fixed-advance font (terminal cells, bitmap fonts)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
}

impl MonospaceMetrics {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }
}
