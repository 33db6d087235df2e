use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::UniverseBuffer;

/// Receiver of universe buffers produced by the translation engine.
///
/// Calls are fire-and-forget: the engine neither waits for nor inspects the
/// outcome, so implementations deal with their own failures.
pub trait DmxSink {
    fn send_dmx(&mut self, universe: u32, buffer: &UniverseBuffer);
}

impl<S: DmxSink + ?Sized> DmxSink for &mut S {
    fn send_dmx(&mut self, universe: u32, buffer: &UniverseBuffer) {
        (**self).send_dmx(universe, buffer);
    }
}

impl<S: DmxSink + ?Sized> DmxSink for Box<S> {
    fn send_dmx(&mut self, universe: u32, buffer: &UniverseBuffer) {
        (**self).send_dmx(universe, buffer);
    }
}

/// Snapshot of one transmitted universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmxFrame {
    pub universe: u32,
    pub data: Vec<u8>,
}

impl DmxFrame {
    pub fn new(universe: u32, buffer: &UniverseBuffer) -> Self {
        Self {
            universe,
            data: buffer.as_slice().to_vec(),
        }
    }

    /// Value of a zero based slot, or `None` past the end of the frame.
    pub fn slot(&self, slot: usize) -> Option<u8> {
        self.data.get(slot).copied()
    }
}

/// Keeps every transmitted frame in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    frames: Vec<DmxFrame>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[DmxFrame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&DmxFrame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl DmxSink for RecordingSink {
    fn send_dmx(&mut self, universe: u32, buffer: &UniverseBuffer) {
        self.frames.push(DmxFrame::new(universe, buffer));
    }
}

/// Writes each frame as one line of JSON.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_frame(&mut self, frame: &DmxFrame) -> crate::Result<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> DmxSink for JsonLinesSink<W> {
    fn send_dmx(&mut self, universe: u32, buffer: &UniverseBuffer) {
        let frame = DmxFrame::new(universe, buffer);
        if let Err(err) = self.write_frame(&frame) {
            tracing::warn!(universe, %err, "dropping DMX frame");
        }
    }
}

/// Logs every frame instead of transmitting it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DmxSink for TracingSink {
    fn send_dmx(&mut self, universe: u32, buffer: &UniverseBuffer) {
        let active = buffer.as_slice().iter().filter(|value| **value != 0).count();
        tracing::debug!(universe, active, "DMX frame");
    }
}
