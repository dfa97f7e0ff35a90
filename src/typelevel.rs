//! # Module supporting type-level programming
//!
//! A [`PinList`](crate::pinlist::PinList) exposes its pins as a single composite value. The
//! width of that value depends on the number of pins, which is only known as a const generic
//! parameter. This module maps the pin count to the narrowest unsigned integer able to hold it:
//!
//! - 1 to 8 pins use [`u8`]
//! - 9 to 16 pins use [`u16`]
//!
//! Any other pin count has no [`PinCount`] implementation, so using such a list is rejected by
//! the compiler.
//!
//! ```
//! use vport_hal::typelevel::Value;
//!
//! assert_eq!(core::mem::size_of::<Value<8>>(), 1);
//! assert_eq!(core::mem::size_of::<Value<9>>(), 2);
//! ```
use crate::Sealed;
use core::fmt::Debug;

/// Type-level pin count
pub enum Count<const N: usize> {}

/// Type class for the pin counts supported by a pin list
pub trait PinCount: Sealed {
    /// Narrowest unsigned integer with at least `N` bits
    type Value: CompositeValue;
}

/// Unsigned integer types usable as composite value of a pin list
///
/// Conversion goes through [`u16`], the widest composite value.
pub trait CompositeValue: Copy + Eq + Debug + Sealed {
    /// Number of bits of the type
    const BITS: u32;

    fn into_bits(self) -> u16;

    /// Truncates `bits` to the width of the type
    fn from_bits(bits: u16) -> Self;
}

impl Sealed for u8 {}
impl Sealed for u16 {}

impl CompositeValue for u8 {
    const BITS: u32 = u8::BITS;

    #[inline(always)]
    fn into_bits(self) -> u16 {
        self as u16
    }

    #[inline(always)]
    fn from_bits(bits: u16) -> Self {
        bits as u8
    }
}

impl CompositeValue for u16 {
    const BITS: u32 = u16::BITS;

    #[inline(always)]
    fn into_bits(self) -> u16 {
        self
    }

    #[inline(always)]
    fn from_bits(bits: u16) -> Self {
        bits
    }
}

macro_rules! pin_counts {
    ($Value:ty => [$($N:literal),+]) => {
        $(
            impl Sealed for Count<$N> {}
            impl PinCount for Count<$N> {
                type Value = $Value;
            }
        )+
    };
}

pin_counts!(u8 => [1, 2, 3, 4, 5, 6, 7, 8]);
pin_counts!(u16 => [9, 10, 11, 12, 13, 14, 15, 16]);

/// Type alias for the composite value of a list of `N` pins
pub type Value<const N: usize> = <Count<N> as PinCount>::Value;
