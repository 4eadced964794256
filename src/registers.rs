use crate::error::{AddressKind, Fault, Result};
use crate::memory::Byte;

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 8;

/// The general purpose registers `R0` to `R7`. Every register holds a
/// single byte, so stored values are always within `0..=255`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RegisterFile {
    values: [Byte; REGISTER_COUNT],
}

impl RegisterFile {
    /// Reads register `index`
    pub fn read(&self, index: usize) -> Result<Byte> {
        self.values
            .get(index)
            .copied()
            .ok_or(Fault::OutOfBounds {
                address_kind: AddressKind::Register,
                index,
            })
    }

    /// Writes `value` to register `index` and returns the stored value
    pub fn write(&mut self, index: usize, value: Byte) -> Result<Byte> {
        let register = self.values.get_mut(index).ok_or(Fault::OutOfBounds {
            address_kind: AddressKind::Register,
            index,
        })?;
        *register = value;

        Ok(value)
    }

    /// All register values, `R0` first
    pub fn values(&self) -> [Byte; REGISTER_COUNT] {
        self.values
    }
}
