//! # GPIO module
//!
//! The pin API of this module follows the
//! [ATSAMD HAL implementation](https://docs.rs/atsamd-hal/0.13.0/atsamd_hal/gpio/v2/index.html),
//! reduced to the register layout of byte-wide ports like the ones found on AVR devices.
//!
//! Hardware ports are described by the [`Port`] trait. The embedding firmware implements it for
//! every port of the device, either by hand or with the [`mmio_port!`](crate::mmio_port) macro.
//!
//! This API provides two different submodules, [`pins`] and [`dynpins`],
//! representing two different ways to handle GPIO pins. The default, [`pins`],
//! is a type-level API where the port and pin number are part of the type. The
//! alternative, [`dynpins`] is a type-erased, value-level API that tracks the
//! pin identity at run-time.
//!
//! The value-level pin identities ([`DynPinId`]) are the building blocks of
//! [`PinList`](crate::pinlist::PinList)s, which group pins of arbitrary ports
//! into one virtual port.
//!
//! ## Example
//!
//! ```ignore
//! vport_hal::mmio_port!(unsafe PortB: 'B', width: 8, data: 0x25, dir: 0x24, pin: 0x23);
//! vport_hal::declare_pins!(PortB, [(PB0, 0), (PB1, 1), (PB5, 5)]);
//!
//! let mut led = PB5::new();
//! led.set_dir_write();
//! led.toggle();
//! ```
pub mod dynpins;
pub use dynpins::*;

pub mod pins;
pub use pins::*;

pub mod port;
pub use port::*;

mod reg;
pub use reg::DynPort;
