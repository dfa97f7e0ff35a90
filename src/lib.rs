#![cfg_attr(not(test), no_std)]

#[cfg(feature = "single-core")]
use cortex_m as _;

#[doc(hidden)]
pub use paste;

pub mod gpio;
pub mod pinlist;
pub mod prelude;
pub mod typelevel;

mod private {
    /// Super trait used to mark traits with an exhaustive set of
    /// implementations
    pub trait Sealed {}
}

pub(crate) use private::Sealed;
