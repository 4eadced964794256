use std::fmt;
use std::io;

use thiserror::Error;

use crate::memory::parse::LoadError;
use crate::memory::Byte;

/// Which storage an out-of-bounds index was aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    Memory,
    Register,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressKind::Memory => f.write_str("memory address"),
            AddressKind::Register => f.write_str("register index"),
        }
    }
}

/// Unrecoverable conditions that stop the machine
#[derive(Debug, Error)]
pub enum Fault {
    #[error("{address_kind} `0x{index:02X}` is out of bounds")]
    OutOfBounds {
        address_kind: AddressKind,
        index: usize,
    },

    #[error("invalid opcode `0b{byte:08b}` at pc `0x{program_counter:02X}`")]
    InvalidOpcode { byte: Byte, program_counter: usize },

    #[error("unsupported ALU operation `{name}`")]
    UnsupportedOperation { name: String },

    #[error("program of {length} bytes does not fit into {capacity} bytes of memory")]
    ProgramTooLarge { length: usize, capacity: usize },

    #[error("failed to load program: {reason}")]
    LoadFailed {
        #[from]
        reason: LoadError,
    },

    #[error("failed to write output")]
    Output(#[from] io::Error),
}

pub type Result<T, E = Fault> = std::result::Result<T, E>;
