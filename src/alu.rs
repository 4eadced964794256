//! Arithmetic logic unit. Results are stored in 8 bit registers, so every
//! operation wraps around modulo 256.

use std::fmt;
use std::str::FromStr;

use crate::error::{Fault, Result};
use crate::memory::Byte;

/// Operations supported by the ALU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Mul,
}

impl AluOp {
    pub const ALL: &'static [Self] = &[Self::Add, Self::Mul];

    pub fn name(&self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Mul => "MUL",
        }
    }

    /// Applies the operation to `a` and `b`
    pub fn apply(self, a: Byte, b: Byte) -> Byte {
        match self {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Mul => a.wrapping_mul(b),
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AluOp {
    type Err = Fault;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name() == name)
            .ok_or_else(|| Fault::UnsupportedOperation {
                name: name.to_owned(),
            })
    }
}

/// Looks up the operation called `name` and applies it to `a` and `b`
pub fn apply(name: &str, a: Byte, b: Byte) -> Result<Byte> {
    let op: AluOp = name.parse()?;
    Ok(op.apply(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_add() -> Result<()> {
        assert_eq!(apply("ADD", 3, 4)?, 7);
        assert_eq!(apply("ADD", 255, 1)?, 0);
        assert_eq!(apply("ADD", 200, 100)?, 44);

        Ok(())
    }

    #[test]
    fn test_mul() -> Result<()> {
        assert_eq!(apply("MUL", 3, 4)?, 12);
        assert_eq!(apply("MUL", 200, 200)?, 64); // 40000 mod 256
        assert_eq!(apply("MUL", 16, 16)?, 0);

        Ok(())
    }

    #[test]
    fn test_unsupported_operation() -> Result<()> {
        for name in ["DIV", "mul", ""] {
            assert!(matches!(
                apply(name, 1, 2),
                Err(Fault::UnsupportedOperation { name: op }) if op == name
            ));
        }

        Ok(())
    }
}
