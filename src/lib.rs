//! Emulator for the LS-8, an 8-bit machine with 256 bytes of memory and
//! eight general purpose registers.

pub mod alu;
pub mod error;
pub mod machine;
pub mod memory;
pub mod output;
pub mod processor;
pub mod registers;
