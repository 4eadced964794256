use crate::error::{AddressKind, Fault, Result};

pub mod parse;

pub type Byte = u8; // 1 byte
pub type Address = usize;

/// Number of addressable cells of the LS-8
pub const MEMORY_SIZE: usize = 256;

/// Memory of the LS-8
pub type Ls8Mem = Memory<MEMORY_SIZE>;

/// Emulates memory for use with the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Memory<const S: usize> {
    /// The actual data of the memory
    data: [Byte; S],
}

impl<const S: usize> Default for Memory<S> {
    /// Initializes the memory with zeros
    fn default() -> Self {
        Memory { data: [0; S] }
    }
}

impl<const S: usize> Memory<S> {
    /// Reads a byte from the memory
    pub fn read_byte(&self, address: Address) -> Result<Byte> {
        self.data
            .get(address)
            .copied()
            .ok_or(Fault::OutOfBounds {
                address_kind: AddressKind::Memory,
                index: address,
            })
    }

    /// Writes a byte to the memory
    pub fn write_byte(&mut self, address: Address, value: Byte) -> Result<()> {
        let cell = self.data.get_mut(address).ok_or(Fault::OutOfBounds {
            address_kind: AddressKind::Memory,
            index: address,
        })?;
        *cell = value;

        Ok(())
    }

    /// Writes an array of bytes to the memory
    pub fn write_array(&mut self, address: Address, data: &[Byte]) -> Result<()> {
        let end = address.checked_add(data.len()).filter(|end| *end <= S);
        let end = end.ok_or(Fault::OutOfBounds {
            address_kind: AddressKind::Memory,
            index: address.saturating_add(data.len()).saturating_sub(1),
        })?;
        self.data[address..end].copy_from_slice(data);

        Ok(())
    }

    /// Copies a program image to the start of the memory.
    ///
    /// # Errors
    ///
    /// Fails with [`Fault::ProgramTooLarge`] if the image does not fit. The
    /// memory is left untouched in that case.
    pub fn load_program(&mut self, program: &[Byte]) -> Result<()> {
        if program.len() > S {
            return Err(Fault::ProgramTooLarge {
                length: program.len(),
                capacity: S,
            });
        }

        log::debug!("Loading {} bytes", program.len());
        self.write_array(0, program)
    }
}

/// Writes a block of instructions directly into the memory
#[macro_export]
macro_rules! write_instructions {
    ( $mem:ident : $pos:expr => $( $byte:expr ),+ ) => {
        $mem.write_array($pos, &[
            $(
                $byte as $crate::memory::Byte,
            )+
        ])
    };
}
