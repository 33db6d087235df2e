//! Maps MIDI addressing onto `(buffer, slot)` coordinates.
//!
//! The functions here only compute raw coordinates. They are turned into a
//! [`SlotAddress`](crate::SlotAddress) by
//! [`UniverseBufferStore::address`](crate::UniverseBufferStore::address),
//! which rejects anything the store cannot hold.

use crate::universe::SLOTS_PER_UNIVERSE;

/// Highest controller number accepted in 14-bit CC mode.
pub const CC14_MAX_CONTROLLER: u8 = 65;

/// Controllers carrying the coarse part of a 14-bit CC pair.
const CC14_PAIR: u8 = 32;

/// Raw coordinates of a slot, not yet validated against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinates {
    pub buffer: usize,
    pub slot: usize,
}

/// The two halves of a 14-bit CC value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    Coarse,
    Fine,
}

/// 7-bit CC / note-on: one universe per MIDI channel, one slot per
/// controller number.
pub fn simple7(channel: u8, controller: u8) -> Coordinates {
    Coordinates {
        buffer: usize::from(channel),
        slot: usize::from(controller),
    }
}

/// 14-bit CC: 32 slots per MIDI channel in the first universe. Controllers
/// 0..=31 carry the coarse part, 32 and above the fine part. Controllers
/// above [`CC14_MAX_CONTROLLER`] are not mapped.
pub fn simple14(channel: u8, controller: u8) -> Option<(Coordinates, Fragment)> {
    if controller > CC14_MAX_CONTROLLER {
        return None;
    }
    let fragment = if controller < CC14_PAIR {
        Fragment::Coarse
    } else {
        Fragment::Fine
    };
    let slot = usize::from(controller % CC14_PAIR) + usize::from(channel) * usize::from(CC14_PAIR);
    Some((Coordinates { buffer: 0, slot }, fragment))
}

/// NRPN: the 14-bit parameter number is split into 512 slot pages, one page
/// per universe buffer.
pub fn nrpn(parameter: u16) -> Coordinates {
    let parameter = usize::from(parameter);
    Coordinates {
        buffer: parameter / SLOTS_PER_UNIVERSE,
        slot: parameter % SLOTS_PER_UNIVERSE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple7_uses_channel_as_buffer() {
        for channel in 0..16 {
            for controller in [0, 64, 127] {
                let coords = simple7(channel, controller);
                assert_eq!(coords.buffer, usize::from(channel));
                assert_eq!(coords.slot, usize::from(controller));
            }
        }
    }

    #[test]
    fn simple14_pairs_controllers_by_channel() {
        assert_eq!(
            simple14(0, 0),
            Some((Coordinates { buffer: 0, slot: 0 }, Fragment::Coarse))
        );
        assert_eq!(
            simple14(1, 37),
            Some((Coordinates { buffer: 0, slot: 37 }, Fragment::Fine))
        );
        assert_eq!(
            simple14(15, 31),
            Some((Coordinates { buffer: 0, slot: 511 }, Fragment::Coarse))
        );
    }

    #[test]
    fn simple14_wraps_controllers_64_and_65_onto_first_slots() {
        assert_eq!(
            simple14(2, 64),
            Some((Coordinates { buffer: 0, slot: 64 }, Fragment::Fine))
        );
        assert_eq!(
            simple14(0, 65),
            Some((Coordinates { buffer: 0, slot: 1 }, Fragment::Fine))
        );
    }

    #[test]
    fn simple14_ignores_high_controllers() {
        assert_eq!(simple14(0, 66), None);
        assert_eq!(simple14(0, 127), None);
    }

    #[test]
    fn nrpn_pages_parameters_by_universe() {
        assert_eq!(nrpn(0), Coordinates { buffer: 0, slot: 0 });
        assert_eq!(nrpn(511), Coordinates { buffer: 0, slot: 511 });
        assert_eq!(nrpn(512), Coordinates { buffer: 1, slot: 0 });
        assert_eq!(nrpn(16383), Coordinates { buffer: 31, slot: 511 });
    }
}
