//! The drawing seam between the simulation and whatever presents it.
//!
//! The core never interprets a surface; it only asks it to draw named sprites
//! and strings at positions.

use glam::Vec2;

use crate::entity::collision::Rect;
use crate::error::RenderError;

/// How a line of text should be emphasised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    Normal,
    /// The currently selected menu entry.
    Highlighted,
    /// Debug information drawn over everything else, e.g. the FPS counter.
    Overlay,
}

/// Full-screen effects layered over the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Fog,
}

/// An opaque drawing context, supplied by the frontend once per frame.
pub trait Surface {
    fn draw_sprite(&mut self, sprite: &str, bounds: Rect) -> Result<(), RenderError>;

    fn draw_text(&mut self, text: &str, position: Vec2, style: TextStyle) -> Result<(), RenderError>;

    fn fill_overlay(&mut self, overlay: Overlay) -> Result<(), RenderError>;
}

/// Anything that knows how to draw itself.
pub trait Paint {
    fn paint(&self, surface: &mut dyn Surface) -> Result<(), RenderError>;
}
