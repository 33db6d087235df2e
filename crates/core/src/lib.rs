//! Core library for the midiola MIDI to DMX bridge.
//!
//! A [`TranslationContext`] receives MIDI channel messages in arrival order
//! and turns them into slot values inside a set of DMX512 universe buffers.
//! Changed buffers are handed to a [`DmxSink`], which owns the actual
//! transmission to the lighting network.
//!
//! Four translation modes are supported: 7-bit and 14-bit control change,
//! and 7-bit and 14-bit NRPN addressing. Note-on messages can additionally be
//! translated as 7-bit control changes.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod midi;
pub mod nrpn;
pub mod resolver;
pub mod sink;
pub mod universe;

pub use config::{BridgeConfig, Listen, TranslationSettings};
pub use dispatch::{Mode, TranslationContext};
pub use error::{MidiolaError, Result};
pub use gate::ChannelMask;
pub use midi::{MessageKind, MidiMessage};
pub use nrpn::NrpnAccumulator;
pub use sink::{DmxFrame, DmxSink, JsonLinesSink, RecordingSink, TracingSink};
pub use universe::{SlotAddress, UniverseBuffer, UniverseBufferStore, MAX_UNIVERSES, SLOTS_PER_UNIVERSE};
