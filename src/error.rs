//! Centralized error types for the game.
//!
//! Nothing here is fatal to the game loop: render and save errors are logged
//! and the loop continues. Audio errors never leave [`crate::audio::Audio`].

use std::io;

/// Main error type for the game.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to start spawn timer '{name}': {source}")]
    SpawnTimer {
        name: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Errors reading or writing the persisted save record.
#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Save record has {0} fields, expected 8")]
    FieldCount(usize),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// Errors raised by an audio backend. Always recoverable.
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("Sound not found: {0}")]
    NotFound(String),

    #[error("Playback failed: {0}")]
    Playback(String),
}

/// Errors raised by a drawing surface. Always recoverable.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Sprite not found: {0}")]
    SpriteNotFound(String),

    #[error("Rendering failed: {0}")]
    Failed(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
