//! # Port contract
//!
//! A [`Port`] is a byte-wide group of hardware registers:
//!
//! - the data register, holding the value driven on output pins
//! - the direction register, a set bit configures the pin as output
//! - the pin-state register, reflecting the electrical level of every pin
//!
//! Ports are static hardware. The trait only has associated functions and
//! constants, implementors are usually uninhabited `enum`s.
//!
//! Port registers are shared, globally mutable resources. Nothing prevents an
//! interrupt handler from modifying a register between the read and the write
//! of a read-modify-write sequence. The default implementations of
//! [`Port::set`], [`Port::clear`], [`Port::toggle`], [`Port::dir_set`] and
//! [`Port::dir_clear`] therefore run inside a critical section. Hardware with
//! write-1-to-set/clear registers should override them.

/// Value-level port identity, usually the port letter
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PortId(pub char);

/// Byte-wide hardware port
pub trait Port {
    /// Identity used to tell ports apart at the value level
    const ID: PortId;

    /// Number of pins of the port, 1 to 8
    const WIDTH: u8 = 8;

    /// Write the data register
    fn write(value: u8);

    /// Read back the data register
    fn read() -> u8;

    /// Write the direction register
    fn dir_write(value: u8);

    /// Read back the direction register
    fn dir_read() -> u8;

    /// Read the live electrical level of the pins
    fn pin_read() -> u8;

    /// Set the bits of `mask` in the data register
    #[inline]
    fn set(mask: u8) {
        critical_section::with(|_| Self::write(Self::read() | mask));
    }

    /// Clear the bits of `mask` in the data register
    #[inline]
    fn clear(mask: u8) {
        critical_section::with(|_| Self::write(Self::read() & !mask));
    }

    /// Toggle the bits of `mask` in the data register
    #[inline]
    fn toggle(mask: u8) {
        critical_section::with(|_| Self::write(Self::read() ^ mask));
    }

    /// Configure the pins of `mask` as outputs
    #[inline]
    fn dir_set(mask: u8) {
        critical_section::with(|_| Self::dir_write(Self::dir_read() | mask));
    }

    /// Configure the pins of `mask` as inputs
    #[inline]
    fn dir_clear(mask: u8) {
        critical_section::with(|_| Self::dir_write(Self::dir_read() & !mask));
    }
}

/// Mask with the lowest `width` bits set
#[inline(always)]
pub(crate) const fn width_mask(width: u8) -> u8 {
    if width >= 8 {
        0xff
    } else {
        (1 << width) - 1
    }
}

/// Declare a [`Port`] backed by three memory-mapped byte registers
///
/// The registers are accessed with volatile reads and writes. The invocation
/// has to start with `unsafe`:
///
/// ```ignore
/// vport_hal::mmio_port!(
///     /// PORTB of the ATmega328P
///     unsafe PortB: 'B', width: 8, data: 0x25, dir: 0x24, pin: 0x23
/// );
/// ```
///
/// # Safety
///
/// `data`, `dir` and `pin` must be the addresses of the data, direction and
/// pin-state registers of one port, valid for byte-sized volatile access for the
/// whole lifetime of the program.
#[macro_export]
macro_rules! mmio_port {
    (
        $(#[$attr:meta])*
        unsafe $Name:ident: $id:literal, width: $width:literal,
        data: $data:expr, dir: $dir:expr, pin: $pin:expr $(,)?
    ) => {
        $(#[$attr])*
        pub enum $Name {}

        impl $crate::gpio::Port for $Name {
            const ID: $crate::gpio::PortId = $crate::gpio::PortId($id);
            const WIDTH: u8 = $width;

            #[inline(always)]
            fn write(value: u8) {
                unsafe { core::ptr::write_volatile(($data) as *mut u8, value) }
            }

            #[inline(always)]
            fn read() -> u8 {
                unsafe { core::ptr::read_volatile(($data) as *const u8) }
            }

            #[inline(always)]
            fn dir_write(value: u8) {
                unsafe { core::ptr::write_volatile(($dir) as *mut u8, value) }
            }

            #[inline(always)]
            fn dir_read() -> u8 {
                unsafe { core::ptr::read_volatile(($dir) as *const u8) }
            }

            #[inline(always)]
            fn pin_read() -> u8 {
                unsafe { core::ptr::read_volatile(($pin) as *const u8) }
            }
        }
    };
}

#[cfg(test)]
pub(crate) mod mock {
    use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

    /// Simulated port registers
    ///
    /// The pin-state register returns the data register for output pins and the
    /// externally driven level `ext` for input pins.
    pub(crate) struct MockRegs {
        pub data: AtomicU8,
        pub dir: AtomicU8,
        pub ext: AtomicU8,
        pub data_reads: AtomicUsize,
        pub data_writes: AtomicUsize,
    }

    impl MockRegs {
        pub const fn new() -> Self {
            MockRegs {
                data: AtomicU8::new(0),
                dir: AtomicU8::new(0),
                ext: AtomicU8::new(0),
                data_reads: AtomicUsize::new(0),
                data_writes: AtomicUsize::new(0),
            }
        }

        pub fn data(&self) -> u8 {
            self.data.load(Ordering::SeqCst)
        }

        pub fn dir(&self) -> u8 {
            self.dir.load(Ordering::SeqCst)
        }

        pub fn preset(&self, data: u8, dir: u8) {
            self.data.store(data, Ordering::SeqCst);
            self.dir.store(dir, Ordering::SeqCst);
        }

        pub fn drive(&self, ext: u8) {
            self.ext.store(ext, Ordering::SeqCst);
        }

        pub fn reads(&self) -> usize {
            self.data_reads.load(Ordering::SeqCst)
        }

        pub fn writes(&self) -> usize {
            self.data_writes.load(Ordering::SeqCst)
        }

        pub fn pin_state(&self) -> u8 {
            let dir = self.dir();
            (self.data() & dir) | (self.ext.load(Ordering::SeqCst) & !dir)
        }
    }

    /// Declare a port with its own [`MockRegs`]. Every test uses its own ports,
    /// tests run in parallel.
    macro_rules! mock_port {
        ($Name:ident, $id:literal) => {
            mock_port!($Name, $id, 8);
        };
        ($Name:ident, $id:literal, $width:literal) => {
            pub enum $Name {}

            impl $Name {
                pub fn regs() -> &'static $crate::gpio::port::mock::MockRegs {
                    static REGS: $crate::gpio::port::mock::MockRegs =
                        $crate::gpio::port::mock::MockRegs::new();
                    &REGS
                }
            }

            impl $crate::gpio::Port for $Name {
                const ID: $crate::gpio::PortId = $crate::gpio::PortId($id);
                const WIDTH: u8 = $width;

                fn write(value: u8) {
                    let regs = Self::regs();
                    regs.data_writes
                        .fetch_add(1, core::sync::atomic::Ordering::SeqCst);
                    regs.data.store(value, core::sync::atomic::Ordering::SeqCst);
                }

                fn read() -> u8 {
                    let regs = Self::regs();
                    regs.data_reads
                        .fetch_add(1, core::sync::atomic::Ordering::SeqCst);
                    regs.data()
                }

                fn dir_write(value: u8) {
                    Self::regs()
                        .dir
                        .store(value, core::sync::atomic::Ordering::SeqCst);
                }

                fn dir_read() -> u8 {
                    Self::regs().dir()
                }

                fn pin_read() -> u8 {
                    Self::regs().pin_state()
                }
            }
        };
    }

    pub(crate) use mock_port;
}
