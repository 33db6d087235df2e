use std::fmt;

use crate::{MidiolaError, Result};

/// Set of MIDI channels the bridge listens to, one bit per channel.
///
/// Bit `n` corresponds to the zero based channel `n`. All channels are
/// enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMask(u16);

impl ChannelMask {
    pub const ALL: Self = Self(0xFFFF);

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    /// Builds a mask with every channel enabled except the given ones.
    /// Channels are numbered 1..=16 as users see them.
    pub fn excluding<I>(channels: I) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut mask = Self::ALL;
        for channel in channels {
            mask.exclude(channel)?;
        }
        Ok(mask)
    }

    /// Disables a single 1-based channel.
    pub fn exclude(&mut self, channel: i64) -> Result<()> {
        if !(1..=16).contains(&channel) {
            return Err(MidiolaError::ChannelOutOfRange(channel));
        }
        self.0 &= !(1 << (channel - 1));
        Ok(())
    }

    /// Returns whether messages on the zero based `channel` pass the gate.
    pub fn is_enabled(&self, channel: u8) -> bool {
        channel < 16 && self.0 & (1 << channel) != 0
    }

    /// Enabled channels, numbered 1..=16.
    pub fn enabled_channels(&self) -> impl Iterator<Item = u8> + '_ {
        (0..16u8)
            .filter(|channel| self.is_enabled(*channel))
            .map(|channel| channel + 1)
    }
}

impl Default for ChannelMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels: Vec<String> = self
            .enabled_channels()
            .map(|channel| channel.to_string())
            .collect();
        f.write_str(&channels.join(", "))
    }
}
