//! # Bit remapping between composite values and port registers
//!
//! Both directions work on one [`Partition`]. Serial partitions move all of
//! their bits with one shift, scattered partitions move every bit on its own.
//! All transforms are `const fn`, so a pin list stored in a `const` item
//! folds down to the shifts and masks a hand-written implementation would use.
use super::layout::{Layout, Partition};

impl Partition {
    /// Bits of the port register which represent `value`
    ///
    /// Bits of `value` which are not located on this port are ignored.
    #[inline]
    pub const fn to_port_bits(&self, value: u16) -> u8 {
        match self.layout() {
            Layout::Serial { offset } => shift_to_port(value, offset) & self.mask(),
            Layout::Scattered => self.scatter(value),
        }
    }

    /// Part of the composite value represented by the port register value `raw`
    ///
    /// Bits of `raw` which do not belong to the pin list are ignored.
    #[inline]
    pub const fn from_port_bits(&self, raw: u8) -> u16 {
        match self.layout() {
            Layout::Serial { offset } => shift_to_value(raw, offset) & self.value_mask(),
            Layout::Scattered => self.gather(raw),
        }
    }

    /// Per-bit version of [`to_port_bits`](Self::to_port_bits), valid for any layout
    pub const fn scatter(&self, value: u16) -> u8 {
        let mut bits = 0;
        let mut i = 0;
        while i < self.len() {
            if value & (1 << self.positions[i]) != 0 {
                bits |= 1 << self.nums[i];
            }
            i += 1;
        }
        bits
    }

    /// Per-bit version of [`from_port_bits`](Self::from_port_bits), valid for any layout
    pub const fn gather(&self, raw: u8) -> u16 {
        let mut value = 0;
        let mut i = 0;
        while i < self.len() {
            if raw & (1 << self.nums[i]) != 0 {
                value |= 1 << self.positions[i];
            }
            i += 1;
        }
        value
    }
}

/// Move value bits to their port bits, `offset` is `position - pin number`
#[inline(always)]
const fn shift_to_port(value: u16, offset: i8) -> u8 {
    let value = value as u32;
    let bits = if offset >= 0 {
        value >> offset as u32
    } else {
        value << offset.unsigned_abs() as u32
    };
    bits as u8
}

/// Move port bits to their value bits, `offset` is `position - pin number`
#[inline(always)]
const fn shift_to_value(raw: u8, offset: i8) -> u16 {
    let raw = raw as u32;
    let bits = if offset >= 0 {
        raw << offset as u32
    } else {
        raw >> offset.unsigned_abs() as u32
    };
    bits as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::port::mock::mock_port;
    use crate::gpio::DynPort;

    mock_port!(PortL, 'L');

    fn partition(members: &[(u8, u8)]) -> Partition {
        members
            .iter()
            .fold(Partition::new(DynPort::of::<PortL>()), |p, &(num, position)| {
                p.push(num, position)
            })
            .solve()
    }

    #[test]
    fn scattered_bits_are_moved_one_by_one() {
        let part = partition(&[(5, 0), (3, 1)]);
        assert_eq!(part.to_port_bits(0b01), 0b0010_0000);
        assert_eq!(part.to_port_bits(0b10), 0b0000_1000);
        assert_eq!(part.to_port_bits(0b111), 0b0010_1000);
        assert_eq!(part.from_port_bits(0b1111_0111), 0b01);
        assert_eq!(part.from_port_bits(0b0000_1000), 0b10);
    }

    #[test]
    fn serial_shift_in_both_directions() {
        // pins 2..=4 at positions 10..=12
        let up = partition(&[(2, 10), (3, 11), (4, 12)]);
        assert_eq!(up.to_port_bits(0b101 << 10), 0b0001_0100);
        assert_eq!(up.from_port_bits(0xff), 0b111 << 10);

        // pins 5..=7 at positions 0..=2
        let down = partition(&[(5, 0), (6, 1), (7, 2)]);
        assert_eq!(down.to_port_bits(0b110), 0b1100_0000);
        assert_eq!(down.from_port_bits(0b1010_0000), 0b101);
    }

    #[test]
    fn bits_in_place_pass_through() {
        let part = partition(&[(1, 1), (4, 0)]);
        assert_eq!(part.to_port_bits(0b11), 0b0001_0010);
        assert_eq!(part.from_port_bits(0b0001_0010), 0b11);
    }

    #[test]
    fn serial_agrees_with_per_bit_transform() {
        let layouts: [&[(u8, u8)]; 4] = [
            &[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6), (7, 7)],
            &[(4, 9), (5, 10), (6, 11), (7, 12), (3, 8)],
            &[(3, 0), (4, 1)],
            &[(7, 15)],
        ];
        for members in layouts {
            let part = partition(members);
            assert!(part.is_contiguous());
            for value in 0..=u16::MAX {
                assert_eq!(part.to_port_bits(value), part.scatter(value));
            }
            for raw in 0..=u8::MAX {
                assert_eq!(part.from_port_bits(raw), part.gather(raw));
            }
        }
    }

    #[test]
    fn read_inverts_write() {
        let part = partition(&[(6, 2), (0, 0), (3, 1), (7, 3)]);
        for value in 0..16u16 {
            assert_eq!(part.from_port_bits(part.to_port_bits(value)), value);
        }
    }
}
