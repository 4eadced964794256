use std::fmt;

use crate::error::Result;
use crate::memory::{Address, Byte, Ls8Mem};
use crate::registers::{RegisterFile, REGISTER_COUNT};

/// The complete state of an LS-8: memory, registers and program counter.
///
/// Every access is bounds checked, nothing is wrapped or truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Machine {
    memory: Ls8Mem,
    registers: RegisterFile,
    /// Program counter
    pc: Address,
}

impl Machine {
    pub fn read_memory(&self, address: Address) -> Result<Byte> {
        self.memory.read_byte(address)
    }

    pub fn write_memory(&mut self, address: Address, value: Byte) -> Result<()> {
        self.memory.write_byte(address, value)
    }

    pub fn read_register(&self, index: usize) -> Result<Byte> {
        self.registers.read(index)
    }

    pub fn write_register(&mut self, index: usize, value: Byte) -> Result<Byte> {
        self.registers.write(index, value)
    }

    /// Writes `program` to memory starting at address 0. Used by loaders.
    pub fn load_program(&mut self, program: &[Byte]) -> Result<()> {
        self.memory.load_program(program)
    }

    pub fn pc(&self) -> Address {
        self.pc
    }

    pub fn set_pc(&mut self, pc: Address) {
        self.pc = pc;
    }

    pub fn memory(&self) -> &Ls8Mem {
        &self.memory
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Captures the state around the program counter for tracing
    pub fn snapshot(&self) -> Snapshot {
        let mut next = [None; 3];
        for (offset, byte) in next.iter_mut().enumerate() {
            *byte = self
                .pc
                .checked_add(offset)
                .and_then(|address| self.memory.read_byte(address).ok());
        }

        Snapshot {
            pc: self.pc,
            next,
            registers: self.registers.values(),
        }
    }
}

/// Read-only view of the machine used for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Snapshot {
    pub pc: Address,
    /// The bytes at `pc`, `pc + 1` and `pc + 2`; `None` past the end of memory
    pub next: [Option<Byte>; 3],
    pub registers: [Byte; REGISTER_COUNT],
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TRACE: {:02X} |", self.pc)?;
        for byte in &self.next {
            match byte {
                Some(byte) => write!(f, " {:02X}", byte)?,
                None => f.write_str(" --")?,
            }
        }
        f.write_str(" |")?;
        for value in &self.registers {
            write!(f, " {:02X}", value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AddressKind, Fault};
    use color_eyre::eyre::Result;

    #[test]
    fn test_checked_access() -> Result<()> {
        let mut machine = Machine::default();

        machine.write_memory(0xFF, 0xAB)?;
        machine.write_register(7, 0xCD)?;
        assert_eq!(machine.read_memory(0xFF)?, 0xAB);
        assert_eq!(machine.read_register(7)?, 0xCD);

        assert!(matches!(
            machine.read_memory(0x100),
            Err(Fault::OutOfBounds {
                address_kind: AddressKind::Memory,
                index: 0x100,
            })
        ));
        assert!(matches!(
            machine.write_register(8, 0),
            Err(Fault::OutOfBounds {
                address_kind: AddressKind::Register,
                index: 8,
            })
        ));

        Ok(())
    }

    #[test]
    fn test_load_program_places_bytes_in_order() -> Result<()> {
        let mut machine = Machine::default();
        machine.load_program(&[3, 1, 4, 1, 5])?;

        for (address, byte) in [3, 1, 4, 1, 5].iter().enumerate() {
            assert_eq!(machine.read_memory(address)?, *byte);
        }
        assert_eq!(machine.read_memory(5)?, 0);
        assert_eq!(machine.pc(), 0);

        Ok(())
    }

    #[test]
    fn test_snapshot() -> Result<()> {
        let mut machine = Machine::default();
        machine.load_program(&[0b1000_0010, 0, 8])?;
        machine.write_register(1, 0x2A)?;

        let snapshot = machine.snapshot();
        assert_eq!(snapshot.next, [Some(0x82), Some(0x00), Some(0x08)]);
        assert_eq!(
            snapshot.to_string(),
            "TRACE: 00 | 82 00 08 | 00 2A 00 00 00 00 00 00"
        );

        machine.set_pc(0xFE);
        assert_eq!(machine.snapshot().next, [Some(0), Some(0), None]);

        Ok(())
    }
}
