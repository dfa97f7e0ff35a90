//! # Type-level module for GPIO pins
//!
//! This module provides a type-level API for GPIO pins. The [`Port`] and the
//! pin number are part of the type. Representing GPIO pins in this manner
//! incurs no run-time overhead. Each [`Pin`] struct is zero-sized, so there is
//! no data to copy around, and the resulting assembly is nearly identical to the
//! equivalent, hand-written C.
//!
//! ```ignore
//! pub struct Pin<P, const N: u8>
//! where
//!     P: Port,
//! {
//!     // ...
//! }
//! ```
//!
//! A pin number which does not exist on its port is a compile-time error.
//!
//! Ports are shared hardware, which may be accessed by any code of the
//! firmware. For this reason pins are not singletons and can be created with
//! [`Pin::new`] at any time. The [`declare_pins!`](crate::declare_pins) macro
//! declares type aliases with the datasheet names of the pins.
//!
//! ```ignore
//! vport_hal::declare_pins!(PortB, [(PB0, 0), (PB1, 1)]);
//! let mut pb0 = PB0::new();
//! pb0.set_dir_write();
//! pb0.set();
//! ```
//!
//! # Embedded HAL traits
//!
//! This module implements all of the embedded HAL GPIO traits for each [`Pin`],
//! namely: [`InputPin`], [`OutputPin`], [`StatefulOutputPin`] and
//! [`ToggleableOutputPin`]. The direction of a pin is a run-time setting, so
//! all traits are available regardless of the direction.

use super::dynpins::DynPinId;
use super::port::Port;
use super::reg::{DynPort, RegisterInterface};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

//==================================================================================================
//  Errors and Definitions
//==================================================================================================

/// GPIO error type
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PinError {
    /// The [`DynPin`](crate::gpio::DynPin) did not have the correct ID for the
    /// requested conversion.
    InvalidPinType,
}

//==================================================================================================
//  Pin
//==================================================================================================

/// A type-level GPIO pin, parameterized by its [`Port`] and pin number
pub struct Pin<P: Port, const N: u8> {
    regs: Registers<P, N>,
}

impl<P: Port, const N: u8> Pin<P, N> {
    /// Value-level ID of the pin
    pub const DYN: DynPinId = DynPinId::new(DynPort::of::<P>(), N);

    /// Mask of the pin within its port
    pub const MASK: u8 = Self::DYN.mask();

    #[inline]
    pub const fn new() -> Pin<P, N> {
        Pin {
            regs: Registers { port: PhantomData },
        }
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

    /// Electrical level of the pin, read from the pin-state register
    #[inline]
    pub fn is_set(&self) -> bool {
        self.regs.read_pin()
    }

    /// Level the pin is driven to, read back from the data register
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

impl<P: Port, const N: u8> Default for Pin<P, N> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================================
//  Embedded HAL traits
//==================================================================================================

impl<P: Port, const N: u8> OutputPin for Pin<P, N> {
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

impl<P: Port, const N: u8> StatefulOutputPin for Pin<P, N> {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self.is_set_output())
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.is_set_output())
    }
}

impl<P: Port, const N: u8> ToggleableOutputPin for Pin<P, N> {
    type Error = Infallible;

    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        Pin::toggle(self);
        Ok(())
    }
}

impl<P: Port, const N: u8> InputPin for Pin<P, N> {
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

//==================================================================================================
//  Registers
//==================================================================================================

/// Provide a register interface for [`Pin`]s
struct Registers<P: Port, const N: u8> {
    port: PhantomData<P>,
}

impl<P: Port, const N: u8> RegisterInterface for Registers<P, N> {
    #[inline]
    fn id(&self) -> DynPinId {
        Pin::<P, N>::DYN
    }
}

//==================================================================================================
//  Pin definitions
//==================================================================================================

/// Declare type aliases for the pins of a [`Port`]
///
/// ```ignore
/// vport_hal::declare_pins!(PortB, [(PB0, 0), (PB1, 1), (PB2, 2)]);
/// ```
#[macro_export]
macro_rules! declare_pins {
    ($Port:ident, [$(($Id:ident, $NUM:literal)),+ $(,)?]) => {
        // Need paste macro to use ident in doc attribute
        $crate::paste::paste! {
            $(
                #[doc = "Pin " $NUM " of port [`" $Port "`]"]
                pub type $Id = $crate::gpio::Pin<$Port, $NUM>;
            )+
        }
    };
}
