use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::universe::MAX_UNIVERSES;
use crate::{ChannelMask, MidiolaError, Mode, Result};

const MAX_CLIENT_NAME: usize = 256;

/// Top-level configuration structure for the bridge.
///
/// Usually assembled from command line flags, optionally layered over a JSON
/// file. Nothing here changes once the translation engine is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub mode: Mode,
    /// Universe number of the first buffer.
    pub universe: u32,
    /// Number of universe buffers to allocate and black out.
    pub universes: usize,
    /// MIDI channels (1..=16) to ignore.
    pub exclude: Vec<i64>,
    /// Listen for control-change messages.
    pub cc: bool,
    /// Listen for note-on messages.
    pub note: bool,
    pub client_name: String,
    /// Name filter for the MIDI input port to connect to. A virtual port is
    /// created when this is unset.
    pub port: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            universe: 1,
            universes: MAX_UNIVERSES,
            exclude: Vec::new(),
            cc: false,
            note: false,
            client_name: "midiola".to_string(),
            port: None,
        }
    }
}

impl BridgeConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.channel_mask()?;
        if self.client_name.len() >= MAX_CLIENT_NAME {
            return Err(MidiolaError::ClientNameTooLong(self.client_name.len()));
        }
        if !(1..=MAX_UNIVERSES).contains(&self.universes) {
            return Err(MidiolaError::UniverseCount(self.universes));
        }
        Ok(())
    }

    pub fn channel_mask(&self) -> Result<ChannelMask> {
        ChannelMask::excluding(self.exclude.iter().copied())
    }

    /// Effective message kinds. Control-change handling is switched on when
    /// neither kind was requested.
    pub fn listen(&self) -> Listen {
        Listen {
            control_change: self.cc || !self.note,
            note_on: self.note,
        }
    }

    /// Validates the configuration and extracts what the translation
    /// engine needs.
    pub fn settings(&self) -> Result<TranslationSettings> {
        self.validate()?;
        Ok(TranslationSettings {
            mode: self.mode,
            channels: self.channel_mask()?,
            universe_base: self.universe,
            universes: self.universes,
            listen: self.listen(),
        })
    }
}

/// Which message kinds are translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listen {
    pub control_change: bool,
    pub note_on: bool,
}

impl Default for Listen {
    fn default() -> Self {
        Self {
            control_change: true,
            note_on: false,
        }
    }
}

/// Start-up parameters of a [`TranslationContext`](crate::TranslationContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSettings {
    pub mode: Mode,
    pub channels: ChannelMask,
    pub universe_base: u32,
    pub universes: usize,
    pub listen: Listen,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            channels: ChannelMask::ALL,
            universe_base: 1,
            universes: MAX_UNIVERSES,
            listen: Listen::default(),
        }
    }
}

impl TranslationSettings {
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}
