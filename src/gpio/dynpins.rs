//! # Type-erased, value-level module for GPIO pins
//!
//! Although the type-level API is generally preferred, it is not suitable in
//! all cases. Because each pin is represented by a distinct type, it is not
//! possible to store multiple pins in a homogeneous data structure. The
//! value-level API solves this problem by erasing the type information and
//! tracking the pin at run-time.
//!
//! A pin is identified by a [`DynPinId`], the pair of its [`DynPort`] and its
//! pin number. Pin lists are built from these identities. Value-level pins are
//! represented by the [`DynPin`] type.
//!
//! ```ignore
//! // Erase the type of a pin
//! let pb5: DynPin = PB5::new().into();
//! // Or create it from the pin ID
//! let pb5 = DynPin::new(PB5::DYN);
//! // Convert back to a `Pin`
//! let pb5: PB5 = pb5.try_into().unwrap();
//! ```
//!
//! # Embedded HAL traits
//!
//! This module implements all of the embedded HAL GPIO traits for [`DynPin`].
//! There are no pin modes to get wrong, so the value-level API uses
//! `Error = core::convert::Infallible` like the type-level API.

use super::{
    pins::{Pin, PinError},
    port::Port,
    reg::{DynPort, RegisterInterface},
};
use core::convert::Infallible;
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

//==================================================================================================
//  DynPinId
//==================================================================================================

/// Value-level `struct` representing pin IDs
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DynPinId {
    port: DynPort,
    num: u8,
}

impl DynPinId {
    /// Create the ID of pin `num` of `port`
    ///
    /// Panics if `num` is not below the port width. In `const` context this
    /// is a compile-time error.
    pub const fn new(port: DynPort, num: u8) -> Self {
        assert!(num < port.width(), "pin number exceeds port width");
        DynPinId { port, num }
    }

    #[inline]
    pub const fn port(&self) -> DynPort {
        self.port
    }

    #[inline]
    pub const fn num(&self) -> u8 {
        self.num
    }

    /// Bit mask of the pin within its port
    #[inline]
    pub const fn mask(&self) -> u8 {
        1 << self.num
    }

    /// `const` version of `==`
    #[inline]
    pub const fn same_as(&self, other: &DynPinId) -> bool {
        self.port.same_as(&other.port) && self.num == other.num
    }
}

//==================================================================================================
//  DynRegisters
//==================================================================================================

/// Provide a register interface for [`DynPin`]s
struct DynRegisters {
    id: DynPinId,
}

impl RegisterInterface for DynRegisters {
    #[inline]
    fn id(&self) -> DynPinId {
        self.id
    }
}

//==================================================================================================
//  DynPin
//==================================================================================================

/// A value-level pin, identified by a [`DynPinId`]
///
/// This type acts as a type-erased version of [`Pin`]. Every pin is represented
/// by the same type, and pins are tracked and distinguished at run-time.
pub struct DynPin {
    regs: DynRegisters,
}

impl DynPin {
    #[inline]
    pub const fn new(id: DynPinId) -> Self {
        DynPin {
            regs: DynRegisters { id },
        }
    }

    /// Return a copy of the pin ID
    #[inline]
    pub fn id(&self) -> DynPinId {
        self.regs.id
    }

    /// Drive the pin high
    #[inline]
    pub fn set(&mut self) {
        self.regs.write_pin(true)
    }

    /// Drive the pin to `value`
    #[inline]
    pub fn set_value(&mut self, value: bool) {
        self.regs.write_pin(value)
    }

    /// Drive the pin low
    #[inline]
    pub fn clear(&mut self) {
        self.regs.write_pin(false)
    }

    #[inline]
    pub fn toggle(&mut self) {
        self.regs.toggle()
    }

    /// Electrical level of the pin
    #[inline]
    pub fn is_set(&self) -> bool {
        self.regs.read_pin()
    }

    /// Level the pin is driven to, as read back from the data register
    #[inline]
    pub fn is_set_output(&self) -> bool {
        self.regs.read_out()
    }

    /// Configure the pin as input
    #[inline]
    pub fn set_dir_read(&mut self) {
        self.regs.set_dir(false)
    }

    /// Configure the pin as output
    #[inline]
    pub fn set_dir_write(&mut self) {
        self.regs.set_dir(true)
    }

    #[inline]
    pub fn is_output(&self) -> bool {
        self.regs.is_output()
    }

    /// Returns [`WouldBlock`](nb::Error::WouldBlock) until the pin reads high
    #[inline]
    pub fn poll_set(&self) -> nb::Result<(), Infallible> {
        if self.is_set() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Returns [`WouldBlock`](nb::Error::WouldBlock) until the pin reads low
    #[inline]
    pub fn poll_clear(&self) -> nb::Result<(), Infallible> {
        if self.is_set() {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// Busy-wait until the pin reads high
    pub fn wait_for_set(&self) {
        nb::block!(self.poll_set()).unwrap_or_else(|e| match e {})
    }

    /// Busy-wait until the pin reads low
    pub fn wait_for_clear(&self) {
        nb::block!(self.poll_clear()).unwrap_or_else(|e| match e {})
    }
}

//==================================================================================================
//  Convert between Pin and DynPin
//==================================================================================================

impl<P: Port, const N: u8> From<Pin<P, N>> for DynPin {
    /// Erase the type-level information in a [`Pin`] and return a value-level
    /// [`DynPin`]
    #[inline]
    fn from(_pin: Pin<P, N>) -> Self {
        DynPin::new(Pin::<P, N>::DYN)
    }
}

impl<P: Port, const N: u8> TryFrom<DynPin> for Pin<P, N> {
    type Error = PinError;

    /// Try to recreate a type-level [`Pin`] from a value-level [`DynPin`]
    ///
    /// There is no way for the compiler to know if the conversion will be
    /// successful at compile-time. We must verify the conversion at run-time
    /// or refuse to perform it.
    #[inline]
    fn try_from(pin: DynPin) -> Result<Self, PinError> {
        if pin.regs.id == Pin::<P, N>::DYN {
            Ok(Pin::new())
        } else {
            Err(PinError::InvalidPinType)
        }
    }
}

//==================================================================================================
// Embedded HAL traits
//==================================================================================================

impl OutputPin for DynPin {
    type Error = Infallible;
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set();
        Ok(())
    }
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.clear();
        Ok(())
    }
}

impl StatefulOutputPin for DynPin {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self.is_set_output())
    }
    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.is_set_output())
    }
}

impl InputPin for DynPin {
    type Error = Infallible;
    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.is_set())
    }
    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.is_set())
    }
}

impl ToggleableOutputPin for DynPin {
    type Error = Infallible;
    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        DynPin::toggle(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::port::mock::mock_port;

    mock_port!(PortE, 'E');
    mock_port!(PortF, 'F', 4);

    #[test]
    fn pin_ids() {
        let id = DynPinId::new(DynPort::of::<PortE>(), 6);
        assert_eq!(id.num(), 6);
        assert_eq!(id.mask(), 0b0100_0000);
        assert!(id.same_as(&Pin::<PortE, 6>::DYN));
        assert_ne!(id, Pin::<PortE, 5>::DYN);
        assert_ne!(id.port(), DynPort::of::<PortF>());
    }

    #[test]
    #[should_panic(expected = "pin number exceeds port width")]
    fn pin_number_outside_port_is_rejected() {
        let _ = DynPinId::new(DynPort::of::<PortF>(), 4);
    }

    #[test]
    fn dyn_pin_operations() {
        PortE::regs().preset(0b1000_0000, 0);
        let mut pin = DynPin::new(DynPinId::new(DynPort::of::<PortE>(), 2));
        pin.set_dir_write();
        assert!(pin.is_output());
        assert_eq!(PortE::regs().dir(), 0b0000_0100);
        pin.set();
        assert_eq!(PortE::regs().data(), 0b1000_0100);
        assert!(pin.is_set());
        pin.toggle();
        assert!(!pin.is_set_output());
        pin.set_value(true);
        assert_eq!(pin.is_set_high(), Ok(true));
        pin.set_low().unwrap();
        assert_eq!(PortE::regs().data(), 0b1000_0000);
        pin.set_dir_read();
        PortE::regs().drive(0b0000_0100);
        assert_eq!(pin.is_high(), Ok(true));
        pin.wait_for_set();
        assert!(pin.poll_clear().is_err());
    }

    #[test]
    fn conversion_round_trip() {
        let pin: DynPin = Pin::<PortF, 3>::new().into();
        assert_eq!(pin.id(), Pin::<PortF, 3>::DYN);
        let other = DynPin::new(Pin::<PortF, 2>::DYN);
        assert!(Pin::<PortF, 3>::try_from(pin).is_ok());
        assert_eq!(
            Pin::<PortF, 3>::try_from(other).err(),
            Some(PinError::InvalidPinType)
        );
    }
}
