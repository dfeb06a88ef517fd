//! The loop's only view of a window: decoded intents in, frames out.

use std::collections::BTreeMap;

use glam::Vec2;
use smallvec::SmallVec;
use tracing::trace;

use crate::entity::collision::Rect;
use crate::error::RenderError;
use crate::events::Intent;
use crate::render::{Overlay, Surface, TextStyle};

pub type Intents = SmallVec<[Intent; 4]>;

pub trait Frontend {
    /// Intents decoded since the previous frame, in the order they arrived.
    fn poll_intents(&mut self) -> Intents;

    /// The loop keeps running only while this is `true`.
    fn is_visible(&self) -> bool;

    /// Unfocused windows are paced with a plain sleep instead of a spin.
    fn is_focused(&self) -> bool {
        true
    }

    /// The surface to paint this frame into.
    fn surface(&mut self) -> &mut dyn Surface;

    /// Shows the painted frame.
    fn present(&mut self) -> Result<(), RenderError>;
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Sprite { sprite: String, bounds: Rect },
    Text { text: String, position: Vec2, style: TextStyle },
    Overlay(Overlay),
}

/// A surface that remembers what was drawn on it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<DrawCall>,
    /// Sprites that report as missing.
    missing: Vec<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every draw of `sprite` fail, as if the asset could not be loaded.
    pub fn with_missing_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.missing.push(sprite.into());
        self
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn sprites(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Sprite { sprite, .. } => Some(sprite.as_str()),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn draw_sprite(&mut self, sprite: &str, bounds: Rect) -> Result<(), RenderError> {
        if self.missing.iter().any(|m| m == sprite) {
            return Err(RenderError::SpriteNotFound(sprite.to_string()));
        }
        self.calls.push(DrawCall::Sprite {
            sprite: sprite.to_string(),
            bounds,
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, position: Vec2, style: TextStyle) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            position,
            style,
        });
        Ok(())
    }

    fn fill_overlay(&mut self, overlay: Overlay) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Overlay(overlay));
        Ok(())
    }
}

/// A windowless frontend that replays scripted intents and closes after a fixed number of frames.
#[derive(Debug)]
pub struct HeadlessFrontend {
    frame: u64,
    frame_limit: u64,
    script: BTreeMap<u64, Intents>,
    surface: RecordingSurface,
    /// The calls of the most recently presented frame.
    last_frame: Vec<DrawCall>,
}

impl HeadlessFrontend {
    pub fn new(frame_limit: u64) -> Self {
        Self::with_surface(frame_limit, RecordingSurface::new())
    }

    pub fn with_surface(frame_limit: u64, surface: RecordingSurface) -> Self {
        Self {
            frame: 0,
            frame_limit,
            script: BTreeMap::new(),
            surface,
            last_frame: Vec::new(),
        }
    }

    /// Queues `intent` for delivery at the start of `frame`.
    pub fn schedule(&mut self, frame: u64, intent: Intent) -> &mut Self {
        self.script.entry(frame).or_default().push(intent);
        self
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }
}

impl Frontend for HeadlessFrontend {
    fn poll_intents(&mut self) -> Intents {
        self.script.remove(&self.frame).unwrap_or_default()
    }

    fn is_visible(&self) -> bool {
        self.frame < self.frame_limit
    }

    fn surface(&mut self) -> &mut dyn Surface {
        &mut self.surface
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.last_frame = std::mem::take(&mut self.surface.calls);
        trace!(frame = self.frame, calls = self.last_frame.len(), "Frame presented");
        self.frame += 1;
        Ok(())
    }
}
