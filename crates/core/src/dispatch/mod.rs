use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::midi::controller;
use crate::nrpn::{self, NrpnAccumulator, Step};
use crate::resolver::{self, Fragment};
use crate::universe::{with_coarse, with_fine};
use crate::{
    ChannelMask, DmxSink, Listen, MessageKind, MidiMessage, MidiolaError, SlotAddress,
    TranslationSettings, UniverseBuffer, UniverseBufferStore,
};

/// How control-change messages are translated into slot values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// CC 0..=127 set slots 1..=128 at half resolution, one universe per
    /// MIDI channel.
    #[default]
    #[serde(rename = "cc7")]
    Simple7,
    /// CC 0..=31 (coarse) and 32..=63 (fine) set 32 slots per MIDI channel.
    /// The value is sent once the fine part arrives.
    #[serde(rename = "cc14")]
    Simple14,
    /// NRPN parameters 0..=16383 address 512 slots in each of 32 universes,
    /// data entry at half resolution plus increment/decrement.
    #[serde(rename = "nrpn7")]
    NrpnAddressed7,
    /// As [`Mode::NrpnAddressed7`] with full resolution values, sent once the
    /// data entry LSB arrives.
    #[serde(rename = "nrpn14")]
    NrpnAddressed14,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::Simple7,
        Mode::Simple14,
        Mode::NrpnAddressed7,
        Mode::NrpnAddressed14,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Simple7 => "cc7",
            Mode::Simple14 => "cc14",
            Mode::NrpnAddressed7 => "nrpn7",
            Mode::NrpnAddressed14 => "nrpn14",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = MidiolaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| MidiolaError::InvalidMode(s.to_string()))
    }
}

/// All mutable translation state of a running bridge.
///
/// The context is driven from a single thread: every message is applied in
/// full before the next one is looked at, and buffers are handed to the sink
/// synchronously.
#[derive(Debug, Clone)]
pub struct TranslationContext {
    mode: Mode,
    channels: ChannelMask,
    listen: Listen,
    store: UniverseBufferStore,
    nrpn: NrpnAccumulator,
}

impl TranslationContext {
    /// Allocates the universe buffers, transmits a blackout frame for each of
    /// them and returns a context ready to process messages.
    pub fn start<S>(settings: &TranslationSettings, sink: &mut S) -> Self
    where
        S: DmxSink + ?Sized,
    {
        let mut store = UniverseBufferStore::new(settings.universes, settings.universe_base);
        store.blackout(sink);

        let origin = resolver::nrpn(0);
        let nrpn = NrpnAccumulator::new(store.address(origin.buffer, origin.slot));

        Self {
            mode: settings.mode,
            channels: settings.channels,
            listen: settings.listen,
            store,
            nrpn,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn channels(&self) -> ChannelMask {
        self.channels
    }

    pub fn listen(&self) -> Listen {
        self.listen
    }

    pub fn universe_count(&self) -> usize {
        self.store.len()
    }

    pub fn buffer(&self, index: usize) -> Option<&UniverseBuffer> {
        self.store.buffer(index)
    }

    pub fn nrpn(&self) -> &NrpnAccumulator {
        &self.nrpn
    }

    /// Processes one scheduling quantum worth of raw messages in order.
    pub fn process_batch<'a, I, S>(&mut self, batch: I, sink: &mut S)
    where
        I: IntoIterator<Item = &'a [u8]>,
        S: DmxSink + ?Sized,
    {
        for bytes in batch {
            self.process_raw(bytes, sink);
        }
    }

    pub fn process_raw<S>(&mut self, bytes: &[u8], sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        if let Some(message) = MidiMessage::from_bytes(bytes) {
            self.process(&message, sink);
        }
    }

    /// Applies a single message. Disabled channels and message kinds are
    /// dropped before any state changes.
    pub fn process<S>(&mut self, message: &MidiMessage, sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        if !self.channels.is_enabled(message.channel) {
            return;
        }

        let MidiMessage {
            kind,
            channel,
            data1,
            data2,
        } = *message;

        match kind {
            MessageKind::ControlChange if self.listen.control_change => match self.mode {
                Mode::Simple7 => self.simple7(channel, data1, data2, sink),
                Mode::Simple14 => self.simple14(channel, data1, data2, sink),
                Mode::NrpnAddressed7 => self.nrpn7(data1, data2, sink),
                Mode::NrpnAddressed14 => self.nrpn14(data1, data2, sink),
            },
            MessageKind::NoteOn if self.listen.note_on => self.simple7(channel, data1, data2, sink),
            _ => {}
        }
    }

    fn simple7<S>(&mut self, channel: u8, controller: u8, value: u8, sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        let coords = resolver::simple7(channel, controller);
        let Some(address) = self.store.address(coords.buffer, coords.slot) else {
            return;
        };
        self.write_and_emit(address, value << 1, sink);
    }

    fn simple14<S>(&mut self, channel: u8, controller: u8, value: u8, sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        let Some((coords, fragment)) = resolver::simple14(channel, controller) else {
            return;
        };
        let Some(address) = self.store.address(coords.buffer, coords.slot) else {
            return;
        };

        let current = self.store.get(address);
        match fragment {
            Fragment::Coarse => {
                let pending = with_coarse(current, value);
                self.store.set(address, pending);
                tracing::debug!(
                    universe = address.universe(),
                    slot = address.dmx_slot(),
                    pending,
                    "coarse value pending"
                );
            }
            Fragment::Fine => self.write_and_emit(address, with_fine(current, value), sink),
        }
    }

    fn nrpn7<S>(&mut self, controller: u8, value: u8, sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        match controller {
            controller::NRPN_LSB => {
                self.nrpn.set_parameter_lsb(value);
                self.resolve_parameter();
            }
            controller::NRPN_MSB => {
                self.nrpn.set_parameter_msb(value);
                self.resolve_parameter();
            }
            controller::DATA_ENTRY_MSB => {
                self.nrpn.set_value(value << 1);
                self.write_nrpn_value(sink);
            }
            controller::DATA_INCREMENT => self.step_nrpn(Step::Up, sink),
            controller::DATA_DECREMENT => self.step_nrpn(Step::Down, sink),
            _ => {}
        }
    }

    fn nrpn14<S>(&mut self, controller: u8, value: u8, sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        match controller {
            controller::NRPN_LSB => {
                self.nrpn.set_parameter_lsb(value);
                self.resolve_parameter();
            }
            controller::NRPN_MSB => {
                self.nrpn.set_parameter_msb(value);
                self.resolve_parameter();
            }
            controller::DATA_ENTRY_MSB => {
                let pending = self.nrpn.set_value_coarse(value);
                tracing::debug!(parameter = self.nrpn.parameter(), pending, "NRPN coarse value pending");
            }
            controller::DATA_ENTRY_LSB => {
                self.nrpn.set_value_fine(value);
                self.write_nrpn_value(sink);
            }
            controller::DATA_INCREMENT => self.step_nrpn(Step::Up, sink),
            controller::DATA_DECREMENT => self.step_nrpn(Step::Down, sink),
            _ => {}
        }
    }

    fn resolve_parameter(&mut self) {
        let parameter = self.nrpn.parameter();
        let coords = resolver::nrpn(parameter);
        let address = self.store.address(coords.buffer, coords.slot);
        self.nrpn.set_address(address);

        match address {
            Some(address) => tracing::debug!(
                parameter,
                universe = address.universe(),
                slot = address.dmx_slot(),
                "NRPN parameter"
            ),
            None => tracing::debug!(parameter, "NRPN parameter outside configured universes"),
        }
    }

    fn write_nrpn_value<S>(&mut self, sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        if let Some(address) = self.nrpn.address() {
            self.write_and_emit(address, self.nrpn.value(), sink);
        }
    }

    /// Nudges the slot the current parameter resolves to. Nothing is sent
    /// when the slot is already at the bound.
    fn step_nrpn<S>(&mut self, direction: Step, sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        let Some(address) = self.nrpn.address() else {
            return;
        };
        let Some(value) = nrpn::step(self.store.get(address), direction) else {
            return;
        };
        self.nrpn.set_value(value);
        self.write_and_emit(address, value, sink);
    }

    fn write_and_emit<S>(&mut self, address: SlotAddress, value: u8, sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        self.store.set(address, value);
        self.store.emit(address, sink);
        tracing::debug!(
            universe = address.universe(),
            slot = address.dmx_slot(),
            value,
            "slot updated"
        );
    }
}
