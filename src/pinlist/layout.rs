//! # Port partitions
//!
//! A [`Partition`] holds the pins of a pin list which share one port. It knows
//! which bits of the port belong to the list and how they map to the bits of the
//! composite value.
use crate::gpio::DynPort;

/// Maximum number of pins of one port
pub(crate) const MAX_PORT_PINS: usize = 8;

/// How the pins of a partition are arranged relative to their positions
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Layout {
    /// `position - pin number` is `offset` for every pin. The partition is
    /// transferred with a single shift: left by `offset` when reading the port,
    /// right by `offset` when writing it.
    Serial { offset: i8 },
    /// Every pin is transferred on its own
    Scattered,
}

/// The pins of a pin list located on one port
#[derive(Debug, Clone, Copy)]
pub struct Partition {
    port: DynPort,
    mask: u8,
    value_mask: u16,
    pub(super) nums: [u8; MAX_PORT_PINS],
    pub(super) positions: [u8; MAX_PORT_PINS],
    len: u8,
    layout: Layout,
}

impl Partition {
    pub(super) const fn new(port: DynPort) -> Self {
        Partition {
            port,
            mask: 0,
            value_mask: 0,
            nums: [0; MAX_PORT_PINS],
            positions: [0; MAX_PORT_PINS],
            len: 0,
            layout: Layout::Scattered,
        }
    }

    /// Append pin `num` of the port, located at `position` of the composite value.
    ///
    /// The pin list guarantees that no pin is appended twice, so there is room
    /// for every pin of the port.
    pub(super) const fn push(mut self, num: u8, position: u8) -> Self {
        let i = self.len as usize;
        self.nums[i] = num;
        self.positions[i] = position;
        self.len += 1;
        self
    }

    /// Compute the masks and the layout from the members
    pub(super) const fn solve(mut self) -> Self {
        self.mask = 0;
        self.value_mask = 0;
        let first = self.offset_of(0);
        let mut serial = true;
        let mut i = 0;
        while i < self.len as usize {
            self.mask |= 1 << self.nums[i];
            self.value_mask |= 1 << self.positions[i];
            if self.offset_of(i) != first {
                serial = false;
            }
            i += 1;
        }
        self.layout = if serial {
            Layout::Serial { offset: first }
        } else {
            Layout::Scattered
        };
        self
    }

    #[inline(always)]
    const fn offset_of(&self, i: usize) -> i8 {
        self.positions[i] as i8 - self.nums[i] as i8
    }

    #[inline]
    pub const fn port(&self) -> DynPort {
        self.port
    }

    /// Bits of the port which belong to the pin list
    #[inline]
    pub const fn mask(&self) -> u8 {
        self.mask
    }

    /// Bits of the composite value located on this port
    #[inline]
    pub const fn value_mask(&self) -> u16 {
        self.value_mask
    }

    #[inline]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Number of pins on this port
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn is_contiguous(&self) -> bool {
        matches!(self.layout, Layout::Serial { .. })
    }

    /// `position - pin number` of the pins, if it is the same for all of them
    #[inline]
    pub const fn shift_offset(&self) -> Option<i8> {
        match self.layout {
            Layout::Serial { offset } => Some(offset),
            Layout::Scattered => None,
        }
    }

    /// Whether the partition covers every pin of the port. Writing such a
    /// partition does not need to preserve any bits of the register.
    #[inline]
    pub const fn owns_port(&self) -> bool {
        self.mask == self.port.mask()
    }

    /// Pin numbers of the members, in pin list order
    #[inline]
    pub fn pin_numbers(&self) -> &[u8] {
        &self.nums[..self.len as usize]
    }

    /// Positions of the members in the composite value, in pin list order
    #[inline]
    pub fn positions(&self) -> &[u8] {
        &self.positions[..self.len as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::port::mock::mock_port;

    mock_port!(PortJ, 'J');
    mock_port!(PortK, 'K', 4);

    fn partition(port: DynPort, members: &[(u8, u8)]) -> Partition {
        members
            .iter()
            .fold(Partition::new(port), |p, &(num, position)| p.push(num, position))
            .solve()
    }

    #[test]
    fn mask_has_one_bit_per_member() {
        let part = partition(DynPort::of::<PortJ>(), &[(5, 0), (3, 1), (7, 4)]);
        assert_eq!(part.mask(), 0b1010_1000);
        assert_eq!(part.mask().count_ones() as usize, part.len());
        assert_eq!(part.value_mask(), 0b1_0011);
        assert_eq!(part.pin_numbers(), &[5, 3, 7]);
        assert_eq!(part.positions(), &[0, 1, 4]);
    }

    #[test]
    fn constant_offset_is_serial() {
        let part = partition(DynPort::of::<PortJ>(), &[(2, 5), (3, 6), (4, 7)]);
        assert_eq!(part.layout(), Layout::Serial { offset: 3 });
        assert!(part.is_contiguous());

        let part = partition(DynPort::of::<PortJ>(), &[(6, 1), (7, 2), (5, 0)]);
        assert_eq!(part.shift_offset(), Some(-5));
    }

    #[test]
    fn reversed_or_gapped_pins_are_scattered() {
        let part = partition(DynPort::of::<PortJ>(), &[(5, 0), (3, 1)]);
        assert_eq!(part.layout(), Layout::Scattered);
        assert_eq!(part.shift_offset(), None);

        let part = partition(DynPort::of::<PortJ>(), &[(0, 0), (2, 1)]);
        assert!(!part.is_contiguous());
    }

    #[test]
    fn single_pin_is_serial() {
        let part = partition(DynPort::of::<PortJ>(), &[(6, 2)]);
        assert_eq!(part.layout(), Layout::Serial { offset: -4 });
        assert!(!part.owns_port());
    }

    #[test]
    fn full_port_is_owned() {
        let identity: [(u8, u8); 8] = core::array::from_fn(|i| (i as u8, i as u8));
        let part = partition(DynPort::of::<PortJ>(), &identity);
        assert_eq!(part.layout(), Layout::Serial { offset: 0 });
        assert!(part.owns_port());

        let narrow = partition(DynPort::of::<PortK>(), &[(3, 8), (1, 9), (0, 10), (2, 11)]);
        assert_eq!(narrow.mask(), 0b1111);
        assert!(narrow.owns_port());
        assert!(!narrow.is_contiguous());
    }
}
