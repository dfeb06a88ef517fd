//! This module handles the audio playback for the game.
//!
//! Sounds are addressed by logical name; the backend that actually produces
//! them lives outside the simulation. A failing backend never stops the game:
//! errors are logged and the call returns.
use strum_macros::{Display, EnumIter, IntoStaticStr};
use tracing::{debug, trace, warn};

use crate::error::AudioError;

/// Every sound the simulation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum Sound {
    #[strum(serialize = "explosion.wav")]
    Explosion,
    #[strum(serialize = "coin.wav")]
    Coin,
    #[strum(serialize = "backgroundloop.wav")]
    BackgroundLoop,
}

impl Sound {
    /// The resource name the backend should load.
    pub fn file_name(self) -> &'static str {
        self.into()
    }
}

/// Whatever actually makes noise.
pub trait AudioBackend: Send {
    /// Plays a sound once.
    fn play(&mut self, sound: Sound) -> Result<(), AudioError>;

    /// Plays a sound on repeat until stopped.
    fn play_loop(&mut self, sound: Sound) -> Result<(), AudioError>;

    /// Stops everything, including loops.
    fn stop_all(&mut self);
}

/// A backend that only logs, for headless runs.
#[derive(Debug, Default)]
pub struct TracingBackend;

impl AudioBackend for TracingBackend {
    fn play(&mut self, sound: Sound) -> Result<(), AudioError> {
        trace!(sound = sound.file_name(), "Playing sound");
        Ok(())
    }

    fn play_loop(&mut self, sound: Sound) -> Result<(), AudioError> {
        trace!(sound = sound.file_name(), "Looping sound");
        Ok(())
    }

    fn stop_all(&mut self) {
        trace!("Stopping all sounds");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioState {
    Enabled,
    Muted,
    Disabled,
}

/// The audio system for the game.
///
/// Wraps a backend and applies the player's sound and music settings. If no
/// backend is available the audio is disabled and every call silently does
/// nothing.
pub struct Audio {
    backend: Option<Box<dyn AudioBackend>>,
    state: AudioState,
    sounds_on: bool,
    music_on: bool,
    /// Music that should be playing whenever audio is enabled and music is on.
    looping: Option<Sound>,
}

impl Default for Audio {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Audio {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            state: AudioState::Enabled,
            sounds_on: true,
            music_on: true,
            looping: None,
        }
    }

    /// An audio system with no backend.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            state: AudioState::Disabled,
            sounds_on: false,
            music_on: false,
            looping: None,
        }
    }

    /// Applies the sound-effect and music settings from the inventory.
    pub fn apply_settings(&mut self, sounds_on: bool, music_on: bool) {
        self.sounds_on = sounds_on;
        let was_on = self.music_on;
        self.music_on = music_on;
        if was_on && !music_on {
            self.silence();
        } else if !was_on && music_on {
            self.resume_loop();
        }
    }

    /// Plays a sound effect once, if sound effects are on.
    pub fn play_sound(&mut self, sound: Sound) {
        if !self.sounds_on {
            return;
        }
        self.dispatch(sound, false);
    }

    /// Plays music on repeat, if music is on.
    ///
    /// The loop is remembered while muted or while music is off, and starts
    /// once both allow it.
    pub fn play_loop(&mut self, sound: Sound) {
        self.looping = Some(sound);
        self.resume_loop();
    }

    /// The music that plays whenever audio allows it.
    pub fn current_loop(&self) -> Option<Sound> {
        self.looping
    }

    fn resume_loop(&mut self) {
        if let Some(sound) = self.looping.filter(|_| self.music_on) {
            self.dispatch(sound, true);
        }
    }

    fn dispatch(&mut self, sound: Sound, looping: bool) {
        if self.state != AudioState::Enabled {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        let result = if looping { backend.play_loop(sound) } else { backend.play(sound) };
        if let Err(e) = result {
            warn!(sound = sound.file_name(), "Could not play sound: {e}");
        }
    }

    /// Stops everything and forgets the current music.
    pub fn stop_all(&mut self) {
        self.looping = None;
        self.silence();
    }

    fn silence(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.stop_all();
        }
    }

    /// Instantly mute or unmute all sounds.
    pub fn set_mute(&mut self, mute: bool) {
        if self.state == AudioState::Disabled {
            debug!("Audio disabled, ignoring mute request");
            return;
        }
        if mute {
            self.silence();
            self.state = AudioState::Muted;
        } else if self.state == AudioState::Muted {
            self.state = AudioState::Enabled;
            self.resume_loop();
        }
    }

    /// Returns `true` if the audio is muted.
    pub fn is_muted(&self) -> bool {
        self.state == AudioState::Muted
    }

    /// Returns `true` if there is no backend.
    pub fn is_disabled(&self) -> bool {
        self.state == AudioState::Disabled
    }
}
