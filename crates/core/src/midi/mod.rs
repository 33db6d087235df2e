//! Decoding of the raw three byte MIDI channel messages the bridge reacts to.

/// Controller numbers with a fixed meaning in the NRPN modes.
pub mod controller {
    pub const DATA_ENTRY_MSB: u8 = 6;
    pub const DATA_ENTRY_LSB: u8 = 38;
    pub const DATA_INCREMENT: u8 = 96;
    pub const DATA_DECREMENT: u8 = 97;
    pub const NRPN_LSB: u8 = 98;
    pub const NRPN_MSB: u8 = 99;
}

const STATUS_NOTE_ON: u8 = 0x90;
const STATUS_CONTROL_CHANGE: u8 = 0xB0;

/// Message kinds understood by the translation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    ControlChange,
    NoteOn,
}

/// A decoded channel message.
///
/// `channel` is zero based (0..=15). `data1` is the controller or note
/// number and `data2` the value or velocity, both limited to 7 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiMessage {
    pub kind: MessageKind,
    pub channel: u8,
    pub data1: u8,
    pub data2: u8,
}

impl MidiMessage {
    pub fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self::new(MessageKind::ControlChange, channel, controller, value)
    }

    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(MessageKind::NoteOn, channel, note, velocity)
    }

    fn new(kind: MessageKind, channel: u8, data1: u8, data2: u8) -> Self {
        Self {
            kind,
            channel: channel & 0x0F,
            data1: data1 & 0x7F,
            data2: data2 & 0x7F,
        }
    }

    /// Decodes a raw message. Anything that is not a complete note-on or
    /// control-change message yields `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let &[status, data1, data2, ..] = bytes else {
            return None;
        };

        let kind = match status & 0xF0 {
            STATUS_CONTROL_CHANGE => MessageKind::ControlChange,
            STATUS_NOTE_ON => MessageKind::NoteOn,
            _ => return None,
        };

        Some(Self::new(kind, status, data1, data2))
    }

    /// Encodes the message back into its wire form.
    pub fn to_bytes(&self) -> [u8; 3] {
        let status = match self.kind {
            MessageKind::ControlChange => STATUS_CONTROL_CHANGE,
            MessageKind::NoteOn => STATUS_NOTE_ON,
        };
        [status | self.channel, self.data1, self.data2]
    }
}
