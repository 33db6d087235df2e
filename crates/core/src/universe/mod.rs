use std::fmt;

use crate::DmxSink;

/// Number of slots in one DMX512 universe.
pub const SLOTS_PER_UNIVERSE: usize = 512;

/// Upper bound on the number of universe buffers held at once.
pub const MAX_UNIVERSES: usize = 32;

/// Slot values of a single universe. Starts out blacked out.
#[derive(Clone, PartialEq, Eq)]
pub struct UniverseBuffer {
    slots: [u8; SLOTS_PER_UNIVERSE],
}

impl UniverseBuffer {
    pub fn new() -> Self {
        Self {
            slots: [0; SLOTS_PER_UNIVERSE],
        }
    }

    pub fn get(&self, slot: usize) -> Option<u8> {
        self.slots.get(slot).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.slots
    }

    pub fn blackout(&mut self) {
        self.slots = [0; SLOTS_PER_UNIVERSE];
    }

    fn set(&mut self, slot: usize, value: u8) {
        if let Some(target) = self.slots.get_mut(slot) {
            *target = value;
        }
    }
}

impl Default for UniverseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UniverseBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self.slots.iter().filter(|value| **value != 0).count();
        f.debug_struct("UniverseBuffer")
            .field("active_slots", &active)
            .finish()
    }
}

/// Validated location of one slot inside the buffer store.
///
/// Only [`UniverseBufferStore::address`] hands these out, so the buffer and
/// slot indices are always in range for the store that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAddress {
    buffer: usize,
    slot: usize,
    universe: u32,
}

impl SlotAddress {
    /// Zero based index of the buffer inside the store.
    pub fn buffer(&self) -> usize {
        self.buffer
    }

    /// Zero based slot index. DMX numbers slots from 1, see [`Self::dmx_slot`].
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn dmx_slot(&self) -> usize {
        self.slot + 1
    }

    /// Logical universe number the buffer is transmitted as.
    pub fn universe(&self) -> u32 {
        self.universe
    }
}

/// Owns one [`UniverseBuffer`] per addressable universe.
///
/// Buffer `n` is transmitted as universe `base + n`.
#[derive(Debug, Clone)]
pub struct UniverseBufferStore {
    buffers: Vec<UniverseBuffer>,
    base: u32,
}

impl UniverseBufferStore {
    /// Creates `count` blacked out buffers. The count is clamped to
    /// `1..=MAX_UNIVERSES`.
    pub fn new(count: usize, base: u32) -> Self {
        let count = count.clamp(1, MAX_UNIVERSES);
        Self {
            buffers: vec![UniverseBuffer::new(); count],
            base,
        }
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn buffer(&self, index: usize) -> Option<&UniverseBuffer> {
        self.buffers.get(index)
    }

    pub fn universe_of(&self, index: usize) -> u32 {
        self.base.saturating_add(index as u32)
    }

    /// Validates a `(buffer, slot)` pair. Anything outside the store yields
    /// `None`, which callers treat as a no-op.
    pub fn address(&self, buffer: usize, slot: usize) -> Option<SlotAddress> {
        if buffer >= self.buffers.len() || slot >= SLOTS_PER_UNIVERSE {
            return None;
        }
        Some(SlotAddress {
            buffer,
            slot,
            universe: self.universe_of(buffer),
        })
    }

    pub fn get(&self, address: SlotAddress) -> u8 {
        self.buffers[address.buffer].slots[address.slot]
    }

    pub fn set(&mut self, address: SlotAddress, value: u8) {
        self.buffers[address.buffer].set(address.slot, value);
    }

    /// Sends the whole buffer containing `address` to the sink.
    pub fn emit<S>(&self, address: SlotAddress, sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        sink.send_dmx(address.universe, &self.buffers[address.buffer]);
    }

    /// Zeroes every buffer and transmits each one once, in index order.
    pub fn blackout<S>(&mut self, sink: &mut S)
    where
        S: DmxSink + ?Sized,
    {
        for (index, buffer) in self.buffers.iter_mut().enumerate() {
            buffer.blackout();
            let universe = self.base.saturating_add(index as u32);
            tracing::debug!(universe, "blackout");
            sink.send_dmx(universe, buffer);
        }
    }
}

/// Replaces the upper seven bits of `current` with a 7-bit coarse value,
/// keeping bit 0.
pub fn with_coarse(current: u8, coarse: u8) -> u8 {
    (current & 0x01) | ((coarse & 0x7F) << 1)
}

/// Sets bit 0 of `current` when the 7-bit fine value is in its upper half.
pub fn with_fine(current: u8, fine: u8) -> u8 {
    if fine > 63 {
        current | 0x01
    } else {
        current & 0xFE
    }
}
