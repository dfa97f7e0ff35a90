use super::dynpins::DynPinId;
use super::port::{width_mask, Port, PortId};
use core::fmt;
use core::marker::PhantomData;

//==================================================================================================
//  RegisterTable
//==================================================================================================

/// Register accessors of one [`Port`], with the port type erased
struct RegisterTable {
    write: fn(u8),
    read: fn() -> u8,
    set: fn(u8),
    clear: fn(u8),
    toggle: fn(u8),
    dir_write: fn(u8),
    dir_read: fn() -> u8,
    dir_set: fn(u8),
    dir_clear: fn(u8),
    pin_read: fn() -> u8,
}

/// Holds the [`RegisterTable`] of `P` as a constant, so it can be borrowed for `'static`
struct Table<P: Port> {
    port: PhantomData<P>,
}

impl<P: Port> Table<P> {
    const REGS: RegisterTable = RegisterTable {
        write: P::write,
        read: P::read,
        set: P::set,
        clear: P::clear,
        toggle: P::toggle,
        dir_write: P::dir_write,
        dir_read: P::dir_read,
        dir_set: P::dir_set,
        dir_clear: P::dir_clear,
        pin_read: P::pin_read,
    };
}

//==================================================================================================
//  DynPort
//==================================================================================================

/// A value-level handle to a [`Port`]
///
/// Holds the port identity and width together with its register accessors.
/// Two handles compare equal if they have the same [`PortId`].
///
/// The handle is created in `const` context, so a [`DynPort`] stored in a
/// `const` item resolves to direct register accesses after inlining.
#[derive(Clone, Copy)]
pub struct DynPort {
    id: PortId,
    width: u8,
    regs: &'static RegisterTable,
}

impl DynPort {
    /// Erase the type of port `P`
    ///
    /// A [`Port::WIDTH`] outside of 1 to 8 is rejected at compile time.
    pub const fn of<P: Port>() -> Self {
        assert!(P::WIDTH >= 1 && P::WIDTH <= 8, "port width must be 1 to 8 bits");
        DynPort {
            id: P::ID,
            width: P::WIDTH,
            regs: &Table::<P>::REGS,
        }
    }

    #[inline]
    pub const fn id(&self) -> PortId {
        self.id
    }

    #[inline]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Mask of all pins of the port
    #[inline]
    pub const fn mask(&self) -> u8 {
        width_mask(self.width)
    }

    /// `const` version of `==`
    #[inline]
    pub const fn same_as(&self, other: &DynPort) -> bool {
        self.id.0 == other.id.0
    }

    #[inline(always)]
    pub fn write(&self, value: u8) {
        (self.regs.write)(value)
    }

    #[inline(always)]
    pub fn read(&self) -> u8 {
        (self.regs.read)()
    }

    #[inline(always)]
    pub fn set(&self, mask: u8) {
        (self.regs.set)(mask)
    }

    #[inline(always)]
    pub fn clear(&self, mask: u8) {
        (self.regs.clear)(mask)
    }

    #[inline(always)]
    pub fn toggle(&self, mask: u8) {
        (self.regs.toggle)(mask)
    }

    #[inline(always)]
    pub fn dir_write(&self, value: u8) {
        (self.regs.dir_write)(value)
    }

    #[inline(always)]
    pub fn dir_read(&self) -> u8 {
        (self.regs.dir_read)()
    }

    #[inline(always)]
    pub fn dir_set(&self, mask: u8) {
        (self.regs.dir_set)(mask)
    }

    #[inline(always)]
    pub fn dir_clear(&self, mask: u8) {
        (self.regs.dir_clear)(mask)
    }

    #[inline(always)]
    pub fn pin_read(&self) -> u8 {
        (self.regs.pin_read)()
    }
}

impl PartialEq for DynPort {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for DynPort {}

impl fmt::Debug for DynPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynPort")
            .field("id", &self.id)
            .field("width", &self.width)
            .finish()
    }
}

//==================================================================================================
// Register Interface
//==================================================================================================

/// Register access for a single pin
///
/// Implementers supply a pin ID through the [`id`] function. The remaining
/// functions only touch the bit of that pin. Any modification of the registers
/// requires `&mut self`.
///
/// [`id`]: Self::id
pub(super) trait RegisterInterface {
    /// Provide a [`DynPinId`] identifying the pin controlled by this type.
    fn id(&self) -> DynPinId;

    #[inline]
    fn mask_8(&self) -> u8 {
        self.id().mask()
    }

    /// Set the direction of a pin, `true` for output
    #[inline]
    fn set_dir(&mut self, output: bool) {
        let port = self.id().port();
        if output {
            port.dir_set(self.mask_8());
        } else {
            port.dir_clear(self.mask_8());
        }
    }

    /// Whether the pin is configured as output
    #[inline]
    fn is_output(&self) -> bool {
        self.id().port().dir_read() & self.mask_8() != 0
    }

    /// Read the electrical level of the pin
    #[inline]
    fn read_pin(&self) -> bool {
        self.id().port().pin_read() & self.mask_8() != 0
    }

    /// Read back the level the pin is driven to
    #[inline]
    fn read_out(&self) -> bool {
        self.id().port().read() & self.mask_8() != 0
    }

    /// Write the logic level of an output pin
    #[inline]
    fn write_pin(&mut self, bit: bool) {
        let port = self.id().port();
        if bit {
            port.set(self.mask_8());
        } else {
            port.clear(self.mask_8());
        }
    }

    /// Toggle the logic level of an output pin
    #[inline]
    fn toggle(&mut self) {
        self.id().port().toggle(self.mask_8());
    }
}
