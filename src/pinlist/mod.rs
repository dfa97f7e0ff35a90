//! # Pin lists
//!
//! A [`PinList`] groups pins of arbitrary ports into one virtual port. Every
//! pin is assigned a position in a composite value of up to 16 bits, either by
//! its place in the list or explicitly with a [`PositionedPin`]. Reading the
//! virtual port collects the bits of all pins into the composite value, writing
//! it distributes the value to the pins.
//!
//! The pins are grouped by port into [`Partition`]s, in the order the ports are
//! first seen in the list. Each partition knows the bits of its port owned by
//! the list and whether the pins can be transferred with a single shift. Pin
//! lists are usually stored in `const` items, so all of this is computed at
//! compile time and register accesses boil down to a few bit operations per
//! port.
//!
//! ```
//! use core::sync::atomic::{AtomicU8, Ordering};
//! use vport_hal::gpio::Pin;
//! use vport_hal::pinlist::PinList;
//!
//! static B: [AtomicU8; 3] = [AtomicU8::new(0), AtomicU8::new(0), AtomicU8::new(0)];
//! static D: [AtomicU8; 3] = [AtomicU8::new(0), AtomicU8::new(0), AtomicU8::new(0)];
//!
//! vport_hal::mmio_port!(
//!     unsafe PortB: 'B', width: 8, data: B[0].as_ptr(), dir: B[1].as_ptr(), pin: B[2].as_ptr()
//! );
//! vport_hal::mmio_port!(
//!     unsafe PortD: 'D', width: 8, data: D[0].as_ptr(), dir: D[1].as_ptr(), pin: D[2].as_ptr()
//! );
//!
//! const BUS: PinList<3> = PinList::new([
//!     Pin::<PortB, 5>::DYN,
//!     Pin::<PortB, 3>::DYN,
//!     Pin::<PortD, 0>::DYN,
//! ]);
//!
//! B[0].store(0b0100_1000, Ordering::SeqCst);
//! BUS.write(0b101);
//! assert_eq!(B[0].load(Ordering::SeqCst), 0b0110_0000);
//! assert_eq!(D[0].load(Ordering::SeqCst), 0b0000_0001);
//! assert_eq!(BUS.read(), 0b101);
//! ```
//!
//! A malformed list stored in a `const` does not compile:
//!
//! ```compile_fail
//! # use core::sync::atomic::AtomicU8;
//! # use vport_hal::gpio::Pin;
//! # use vport_hal::pinlist::PinList;
//! # static B: [AtomicU8; 3] = [AtomicU8::new(0), AtomicU8::new(0), AtomicU8::new(0)];
//! # vport_hal::mmio_port!(
//! #     unsafe PortB: 'B', width: 8, data: B[0].as_ptr(), dir: B[1].as_ptr(), pin: B[2].as_ptr()
//! # );
//! const BUS: PinList<2> = PinList::new([Pin::<PortB, 1>::DYN, Pin::<PortB, 1>::DYN]);
//! # let _ = BUS.len();
//! ```
//!
//! # Interrupts
//!
//! [`PinList::write`] and [`PinList::dir_write`] merge the bits of the list into
//! registers which may hold bits of other drivers. The read-modify-write is not
//! atomic. If an interrupt handler modifies the same port, use
//! [`PinList::write_atomic`] and [`PinList::dir_write_atomic`] instead.
use crate::gpio::{DynPin, DynPinId};

mod layout;
mod remap;
mod vport;

pub use layout::{Layout, Partition};

/// Maximum number of pins of a [`PinList`]
pub const MAX_PINS: usize = 16;

//==================================================================================================
//  Errors
//==================================================================================================

/// Reasons a pin list is rejected. Indices refer to the list passed to the
/// constructor.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PinListError {
    Empty,
    /// More than [`MAX_PINS`] pins
    TooManyPins,
    /// Position not below the number of pins
    PositionOutOfRange { index: usize },
    /// Same port and pin number at `first` and `second`
    DuplicatePin { first: usize, second: usize },
    /// Same position at `first` and `second`
    DuplicatePosition { first: usize, second: usize },
}

impl PinListError {
    const fn fail(self) -> ! {
        match self {
            PinListError::Empty => panic!("pin list is empty"),
            PinListError::TooManyPins => panic!("pin list has more than 16 pins"),
            PinListError::PositionOutOfRange { .. } => panic!("pin position out of range"),
            PinListError::DuplicatePin { .. } => panic!("duplicate pin in pin list"),
            PinListError::DuplicatePosition { .. } => panic!("duplicate pin position"),
        }
    }
}

//==================================================================================================
//  PositionedPin
//==================================================================================================

/// A pin bound to a bit position of the composite value
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PositionedPin {
    pin: DynPinId,
    position: u8,
}

impl PositionedPin {
    #[inline]
    pub const fn new(pin: DynPinId, position: u8) -> Self {
        PositionedPin { pin, position }
    }

    #[inline]
    pub const fn pin(&self) -> DynPinId {
        self.pin
    }

    #[inline]
    pub const fn position(&self) -> u8 {
        self.position
    }
}

//==================================================================================================
//  PinList
//==================================================================================================

/// A fixed group of `N` pins exposed as one virtual port
///
/// See the [module documentation](self) for an example.
#[derive(Debug, Clone, Copy)]
pub struct PinList<const N: usize> {
    pins: [PositionedPin; N],
    partitions: [Partition; N],
    partition_count: usize,
}

impl<const N: usize> PinList<N> {
    /// Create a pin list, the pin at index `i` is located at position `i`
    ///
    /// Panics on a malformed list, see [`try_new`](Self::try_new). In `const`
    /// context this is a compile-time error.
    pub const fn new(pins: [DynPinId; N]) -> Self {
        match Self::try_new(pins) {
            Ok(list) => list,
            Err(e) => e.fail(),
        }
    }

    /// Create a pin list with explicit positions
    ///
    /// Panics on a malformed list, see [`try_from_positioned`](Self::try_from_positioned).
    pub const fn from_positioned(pins: [PositionedPin; N]) -> Self {
        match Self::try_from_positioned(pins) {
            Ok(list) => list,
            Err(e) => e.fail(),
        }
    }

    /// Create a pin list, the pin at index `i` is located at position `i`
    ///
    /// Fails if the list is empty, has more than [`MAX_PINS`] pins or contains
    /// a pin twice.
    pub const fn try_new(pins: [DynPinId; N]) -> Result<Self, PinListError> {
        if N == 0 {
            return Err(PinListError::Empty);
        }
        let mut positioned = [PositionedPin::new(pins[0], 0); N];
        let mut i = 1;
        while i < N {
            positioned[i] = PositionedPin::new(pins[i], i as u8);
            i += 1;
        }
        Self::try_from_positioned(positioned)
    }

    /// Create a pin list with explicit positions
    ///
    /// In addition to the checks of [`try_new`](Self::try_new), the positions
    /// must be unique and below `N`.
    pub const fn try_from_positioned(pins: [PositionedPin; N]) -> Result<Self, PinListError> {
        match validate(&pins) {
            Ok(()) => Ok(Self::partition(pins)),
            Err(e) => Err(e),
        }
    }

    /// Group a validated list by port
    const fn partition(pins: [PositionedPin; N]) -> Self {
        let mut partitions = [Partition::new(pins[0].pin.port()); N];
        let mut count = 0;
        let mut i = 0;
        while i < N {
            let pin = pins[i].pin;
            let mut k = 0;
            while k < count && !partitions[k].port().same_as(&pin.port()) {
                k += 1;
            }
            if k == count {
                partitions[k] = Partition::new(pin.port());
                count += 1;
            }
            partitions[k] = partitions[k].push(pin.num(), pins[i].position);
            i += 1;
        }
        let mut k = 0;
        while k < count {
            partitions[k] = partitions[k].solve();
            k += 1;
        }
        PinList {
            pins,
            partitions,
            partition_count: count,
        }
    }

    /// Number of pins
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always `false`, empty pin lists are rejected
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Pins in the order they were passed to the constructor
    #[inline]
    pub const fn pins(&self) -> &[PositionedPin; N] {
        &self.pins
    }

    /// Pin at `position` of the composite value
    ///
    /// Panics if `position` is not below `N`.
    pub const fn pin(&self, position: usize) -> DynPin {
        match self.get(position) {
            Some(pin) => pin,
            None => panic!("pin position out of range"),
        }
    }

    /// Pin at `position` of the composite value, if there is one
    pub const fn get(&self, position: usize) -> Option<DynPin> {
        let mut i = 0;
        while i < N {
            if self.pins[i].position as usize == position {
                return Some(DynPin::new(self.pins[i].pin));
            }
            i += 1;
        }
        None
    }

    /// One partition per port, in the order the ports appear in the list
    #[inline]
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions[..self.partition_count]
    }

    /// Bits of the composite value backed by a pin
    #[inline]
    pub const fn value_mask(&self) -> u16 {
        if N >= 16 {
            u16::MAX
        } else {
            (1 << N) - 1
        }
    }
}

const fn validate<const N: usize>(pins: &[PositionedPin; N]) -> Result<(), PinListError> {
    if N == 0 {
        return Err(PinListError::Empty);
    }
    if N > MAX_PINS {
        return Err(PinListError::TooManyPins);
    }
    let mut i = 0;
    while i < N {
        if pins[i].position as usize >= N {
            return Err(PinListError::PositionOutOfRange { index: i });
        }
        let mut j = 0;
        while j < i {
            if pins[j].pin.same_as(&pins[i].pin) {
                return Err(PinListError::DuplicatePin {
                    first: j,
                    second: i,
                });
            }
            if pins[j].position == pins[i].position {
                return Err(PinListError::DuplicatePosition {
                    first: j,
                    second: i,
                });
            }
            j += 1;
        }
        i += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::port::mock::mock_port;
    use crate::gpio::{DynPort, Pin};

    mock_port!(PortN, 'N');
    mock_port!(PortO, 'O', 4);

    const MIXED: PinList<4> = PinList::new([
        Pin::<PortN, 3>::DYN,
        Pin::<PortO, 1>::DYN,
        Pin::<PortN, 5>::DYN,
        Pin::<PortO, 0>::DYN,
    ]);

    #[test]
    fn pins_are_grouped_by_port_in_first_seen_order() {
        let parts = MIXED.partitions();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].port(), DynPort::of::<PortN>());
        assert_eq!(parts[0].pin_numbers(), &[3, 5]);
        assert_eq!(parts[0].positions(), &[0, 2]);
        assert_eq!(parts[1].port(), DynPort::of::<PortO>());
        assert_eq!(parts[1].pin_numbers(), &[1, 0]);
        assert_eq!(parts[1].positions(), &[1, 3]);
        let total: usize = parts.iter().map(|p| p.len()).sum();
        assert_eq!(total, MIXED.len());
    }

    #[test]
    fn pins_by_position() {
        assert_eq!(MIXED.pin(2).id(), Pin::<PortN, 5>::DYN);
        assert_eq!(MIXED.get(3).map(|p| p.id()), Some(Pin::<PortO, 0>::DYN));
        assert!(MIXED.get(4).is_none());
        assert_eq!(MIXED.pins()[1].position(), 1);
        assert_eq!(MIXED.value_mask(), 0b1111);
    }

    #[test]
    fn explicit_positions() {
        let list = PinList::from_positioned([
            PositionedPin::new(Pin::<PortN, 0>::DYN, 2),
            PositionedPin::new(Pin::<PortN, 1>::DYN, 0),
            PositionedPin::new(Pin::<PortN, 2>::DYN, 1),
        ]);
        assert_eq!(list.pin(0).id(), Pin::<PortN, 1>::DYN);
        assert_eq!(list.partitions().len(), 1);
        assert_eq!(list.partitions()[0].mask(), 0b0000_0111);
        assert!(!list.partitions()[0].is_contiguous());
    }

    #[test]
    fn malformed_lists_are_rejected() {
        let n0 = Pin::<PortN, 0>::DYN;
        let n1 = Pin::<PortN, 1>::DYN;
        let o0 = Pin::<PortO, 0>::DYN;
        assert_eq!(PinList::<0>::try_new([]).err(), Some(PinListError::Empty));
        assert_eq!(
            PinList::<17>::try_new([n0; 17]).err(),
            Some(PinListError::TooManyPins)
        );
        assert_eq!(
            PinList::try_new([n0, o0, n0]).err(),
            Some(PinListError::DuplicatePin { first: 0, second: 2 })
        );
        assert_eq!(
            PinList::try_from_positioned([PositionedPin::new(n0, 0), PositionedPin::new(n1, 2)])
                .err(),
            Some(PinListError::PositionOutOfRange { index: 1 })
        );
        assert_eq!(
            PinList::try_from_positioned([PositionedPin::new(n0, 1), PositionedPin::new(n1, 1)])
                .err(),
            Some(PinListError::DuplicatePosition { first: 0, second: 1 })
        );
    }

    #[test]
    fn same_pin_number_on_different_ports_is_allowed() {
        let list = PinList::try_new([Pin::<PortN, 0>::DYN, Pin::<PortO, 0>::DYN]);
        assert!(list.is_ok());
    }

    #[test]
    #[should_panic(expected = "duplicate pin in pin list")]
    fn duplicate_pin_panics() {
        let _ = PinList::new([Pin::<PortN, 2>::DYN, Pin::<PortN, 2>::DYN]);
    }

    #[test]
    #[should_panic(expected = "pin position out of range")]
    fn missing_position_panics() {
        let _ = MIXED.pin(7);
    }
}
