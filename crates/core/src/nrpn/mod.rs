use crate::universe::{with_coarse, with_fine};
use crate::SlotAddress;

const PARAMETER_MASK: u16 = 0x3FFF;
const LOW_BITS: u16 = 0x007F;
const HIGH_BITS: u16 = 0x3F80;

/// Direction of a data increment/decrement message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

/// In-progress NRPN state.
///
/// Holds the 14-bit parameter number assembled from the two parameter
/// fragments, the pending 8-bit value, and the slot the parameter currently
/// resolves to. The address is replaced every time a parameter fragment
/// arrives and is `None` while the parameter points past the configured
/// universes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NrpnAccumulator {
    parameter: u16,
    value: u8,
    address: Option<SlotAddress>,
}

impl NrpnAccumulator {
    pub fn new(address: Option<SlotAddress>) -> Self {
        Self {
            parameter: 0,
            value: 0,
            address,
        }
    }

    pub fn parameter(&self) -> u16 {
        self.parameter
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn address(&self) -> Option<SlotAddress> {
        self.address
    }

    pub fn set_address(&mut self, address: Option<SlotAddress>) {
        self.address = address;
    }

    /// Replaces the low seven bits of the parameter number.
    pub fn set_parameter_lsb(&mut self, lsb: u8) -> u16 {
        self.parameter = (self.parameter & HIGH_BITS) | (u16::from(lsb) & LOW_BITS);
        self.parameter
    }

    /// Replaces the high seven bits of the parameter number.
    pub fn set_parameter_msb(&mut self, msb: u8) -> u16 {
        self.parameter = ((self.parameter & LOW_BITS) | (u16::from(msb) << 7)) & PARAMETER_MASK;
        self.parameter
    }

    pub fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    /// Stores a 7-bit coarse value in the upper bits of the pending value.
    pub fn set_value_coarse(&mut self, coarse: u8) -> u8 {
        self.value = with_coarse(self.value, coarse);
        self.value
    }

    /// Sets bit 0 of the pending value from a 7-bit fine value.
    pub fn set_value_fine(&mut self, fine: u8) -> u8 {
        self.value = with_fine(self.value, fine);
        self.value
    }
}

/// Moves `value` one step, saturating at the 8-bit bounds. Returns `None`
/// when the value is already at the bound.
pub fn step(value: u8, direction: Step) -> Option<u8> {
    match direction {
        Step::Up => value.checked_add(1),
        Step::Down => value.checked_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_order_does_not_change_parameter() {
        let mut msb_first = NrpnAccumulator::default();
        msb_first.set_parameter_msb(0x15);
        msb_first.set_parameter_lsb(0x2A);

        let mut lsb_first = NrpnAccumulator::default();
        lsb_first.set_parameter_lsb(0x2A);
        lsb_first.set_parameter_msb(0x15);

        assert_eq!(msb_first.parameter(), (0x15 << 7) | 0x2A);
        assert_eq!(msb_first.parameter(), lsb_first.parameter());
    }

    #[test]
    fn parameter_fragments_replace_only_their_half() {
        let mut acc = NrpnAccumulator::default();
        acc.set_parameter_msb(127);
        acc.set_parameter_lsb(127);
        assert_eq!(acc.parameter(), 16383);

        acc.set_parameter_lsb(0);
        assert_eq!(acc.parameter(), 16256);
        acc.set_parameter_msb(0);
        assert_eq!(acc.parameter(), 0);
    }

    #[test]
    fn value_fragments_compose_eight_bits() {
        let mut acc = NrpnAccumulator::default();
        acc.set_value_coarse(127);
        assert_eq!(acc.set_value_fine(64), 255);
        assert_eq!(acc.set_value_coarse(0), 1);
        assert_eq!(acc.set_value_fine(0), 0);
    }

    #[test]
    fn step_saturates_at_bounds() {
        assert_eq!(step(254, Step::Up), Some(255));
        assert_eq!(step(255, Step::Up), None);
        assert_eq!(step(1, Step::Down), Some(0));
        assert_eq!(step(0, Step::Down), None);
    }
}
