//! # Virtual port operations
//!
//! Every operation visits the partitions of the list once, in order, and
//! touches no register outside of them.
use super::layout::Partition;
use super::PinList;
use crate::gpio::DynPort;
use crate::typelevel::{CompositeValue, Count, PinCount, Value};

impl<const N: usize> PinList<N>
where
    Count<N>: PinCount,
{
    /// Drive the pins to `value`
    ///
    /// Bits of the ports which do not belong to the list keep their value.
    /// Ports not fully covered by the list are updated with a read-modify-write,
    /// see [`write_atomic`](Self::write_atomic).
    #[inline]
    pub fn write(&self, value: Value<N>) {
        self.merge(value.into_bits(), DynPort::read, DynPort::write)
    }

    /// [`write`](Self::write) inside a critical section
    #[inline]
    pub fn write_atomic(&self, value: Value<N>) {
        critical_section::with(|_| self.write(value))
    }

    /// Drive the pins of the set bits of `value` high
    #[inline]
    pub fn set(&self, value: Value<N>) {
        self.assert_bits(value.into_bits(), DynPort::set)
    }

    /// Drive the pins of the set bits of `value` low
    #[inline]
    pub fn clear(&self, value: Value<N>) {
        self.assert_bits(value.into_bits(), DynPort::clear)
    }

    /// Toggle the pins of the set bits of `value`
    #[inline]
    pub fn toggle(&self, value: Value<N>) {
        self.assert_bits(value.into_bits(), DynPort::toggle)
    }

    /// Level the pins are driven to, read back from the data registers
    #[inline]
    pub fn read(&self) -> Value<N> {
        self.gather(DynPort::read)
    }

    /// Electrical level of the pins, read from the pin-state registers
    #[inline]
    pub fn pin_read(&self) -> Value<N> {
        self.gather(DynPort::pin_read)
    }

    /// Configure the pins of the set bits of `value` as outputs and all others
    /// as inputs
    #[inline]
    pub fn dir_write(&self, value: Value<N>) {
        self.merge(value.into_bits(), DynPort::dir_read, DynPort::dir_write)
    }

    /// [`dir_write`](Self::dir_write) inside a critical section
    #[inline]
    pub fn dir_write_atomic(&self, value: Value<N>) {
        critical_section::with(|_| self.dir_write(value))
    }

    /// Configure the pins of the set bits of `value` as outputs
    #[inline]
    pub fn dir_set(&self, value: Value<N>) {
        self.assert_bits(value.into_bits(), DynPort::dir_set)
    }

    /// Configure the pins of the set bits of `value` as inputs
    #[inline]
    pub fn dir_clear(&self, value: Value<N>) {
        self.assert_bits(value.into_bits(), DynPort::dir_clear)
    }

    /// Set bits are pins configured as outputs
    #[inline]
    pub fn dir_read(&self) -> Value<N> {
        self.gather(DynPort::dir_read)
    }

    #[inline(always)]
    fn merge(&self, value: u16, read: fn(&DynPort) -> u8, write: fn(&DynPort, u8)) {
        for part in self.partitions() {
            let port = part.port();
            let bits = part.to_port_bits(value);
            if part.owns_port() {
                write(&port, bits);
            } else {
                write(&port, (read(&port) & !part.mask()) | bits);
            }
        }
    }

    #[inline(always)]
    fn assert_bits(&self, value: u16, op: fn(&DynPort, u8)) {
        for part in self.partitions() {
            let bits = part.to_port_bits(value);
            if bits != 0 {
                op(&part.port(), bits);
            }
        }
    }

    #[inline(always)]
    fn gather(&self, read: fn(&DynPort) -> u8) -> Value<N> {
        let bits = self
            .partitions()
            .iter()
            .fold(0, |value, part: &Partition| {
                value | part.from_port_bits(read(&part.port()))
            });
        <Value<N> as CompositeValue>::from_bits(bits)
    }
}
