use crate::alu::AluOp;
use crate::error::{Fault, Result};
use crate::machine::{Machine, Snapshot};
use crate::memory::{Address, Byte};
use crate::output::Output;
use log::*;
use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;

/// Operand bytes following an opcode. Unused operands are zero.
pub type Operands = [Byte; 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Running,
    Halted,
}

/// Why [`Processor::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exit {
    /// A `HLT` instruction was executed
    Halted,
    /// The cycle limit was reached before the program halted
    Suspended { cycles: u64 },
}

/// Emulates the CPU of the LS-8
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Processor {
    machine: Machine,
    state: State,
}

impl Default for Processor {
    /// Initializes a new CPU with zeroed memory and registers
    fn default() -> Self {
        Self::new(Machine::default())
    }
}

impl Processor {
    /// Initializes a new CPU that executes on `machine`
    pub fn new(machine: Machine) -> Self {
        Self {
            machine,
            state: State::Running,
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Writes `program` to memory starting at address 0
    pub fn load_program(&mut self, program: &[Byte]) -> Result<()> {
        self.machine.load_program(program)
    }

    /// Sets the program counter to 0 and resumes execution. Memory and
    /// registers are kept, so a loaded program can be run again.
    pub fn reset(&mut self) {
        self.machine.set_pc(0);
        self.state = State::Running;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.machine.snapshot()
    }

    /// Fetches and decodes the instruction at the program counter
    pub fn decode(&self) -> Result<(Instruction, Operands)> {
        let pc = self.machine.pc();
        let opcode = self.machine.read_memory(pc)?; // Read opcode where PC is
        let instruction = Instruction::try_from(opcode).map_err(|_| Fault::InvalidOpcode {
            byte: opcode,
            program_counter: pc,
        })?;

        let mut operands = Operands::default();
        for (offset, operand) in operands.iter_mut().take(instruction.arity()).enumerate() {
            *operand = self.machine.read_memory(pc + 1 + offset)?;
        }

        Ok((instruction, operands))
    }

    /// Executes a single decoded instruction. Does not move the program
    /// counter.
    pub fn execute_instruction<O: Output>(
        &mut self,
        instruction: Instruction,
        operands: Operands,
        output: &mut O,
    ) -> Result<()> {
        let [a, b] = operands;

        match instruction {
            Instruction::HLT => {
                self.state = State::Halted;

                debug!("HLT");
            }
            Instruction::LDI => {
                self.machine.write_register(a as usize, b)?;

                debug!("LDI R{} {}", a, b);
            }
            Instruction::PRN => {
                let value = self.machine.read_register(a as usize)?;
                output.write_line(&value.to_string())?;

                debug!("PRN R{}: {}", a, value);
            }
            Instruction::ADD => self.alu(AluOp::Add, a as usize, b as usize)?,
            Instruction::MUL => self.alu(AluOp::Mul, a as usize, b as usize)?,
        }

        Ok(())
    }

    /// Stores `op` applied to registers `reg_a` and `reg_b` in `reg_a`
    fn alu(&mut self, op: AluOp, reg_a: usize, reg_b: usize) -> Result<()> {
        let a = self.machine.read_register(reg_a)?;
        let b = self.machine.read_register(reg_b)?;
        let result = self.machine.write_register(reg_a, op.apply(a, b))?;

        debug!("{} R{} R{}: {} {} => {}", op, reg_a, reg_b, a, b, result);

        Ok(())
    }

    /// Runs one execution step. Does nothing once the CPU is halted.
    pub fn step<O: Output>(&mut self, output: &mut O) -> Result<()> {
        if self.state == State::Halted {
            return Ok(());
        }

        if log_enabled!(Level::Trace) {
            trace!("{}", self.snapshot());
        }

        let (instruction, operands) = self.decode()?;
        self.execute_instruction(instruction, operands, output)?;

        if self.state == State::Halted {
            self.machine.set_pc(0);
        } else if !instruction.sets_pc() {
            self.machine.set_pc(self.machine.pc() + instruction.len());
        }

        Ok(())
    }

    /// Runs the program until it halts or `max_cycles` instructions were
    /// executed. Calling this on a halted CPU does nothing.
    pub fn run<O: Output>(&mut self, output: &mut O, max_cycles: Option<u64>) -> Result<Exit> {
        let mut cycles = 0;

        while self.state == State::Running {
            if max_cycles.map_or(false, |max| cycles >= max) {
                debug!("Suspended after {} cycles", cycles);
                return Ok(Exit::Suspended { cycles });
            }

            self.step(output)?;
            cycles += 1;
        }

        if cycles > 0 {
            info!("Program halted after {} cycles", cycles);
        }

        Ok(Exit::Halted)
    }

    /// Run program until a `HLT` instruction is executed
    pub fn execute_until_halt<O: Output>(&mut self, output: &mut O) -> Result<()> {
        self.run(output, None).map(|_| ())
    }
}

macro_rules! instructions {
    ( $( $( #[doc = $doc:expr] )+ $name:ident = $repr:literal , )+ ) => {
        /// Defines the instructions. The two high bits of an opcode hold the
        /// number of operands, bit 5 marks ALU operations and bit 4 marks
        /// instructions that set the program counter themselves.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Instruction {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Instruction {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }
        }

        impl ::std::fmt::Display for Instruction {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $( Self::$name => f.write_str(stringify!($name)) , )+
                }
            }
        }
    }
}

instructions! {
    /// Halt the CPU
    HLT = 0b0000_0001,
    /// Print the decimal value stored in a register
    /// @param register The register to print
    PRN = 0b0100_0111,
    /// Load an immediate value into a register
    /// @param register The register to write
    /// @param value The value to load
    LDI = 0b1000_0010,
    /// Add the second register to the first
    /// @param reg_a Operand and destination
    /// @param reg_b Operand
    ADD = 0b1010_0000,
    /// Multiply the first register by the second
    /// @param reg_a Operand and destination
    /// @param reg_b Operand
    MUL = 0b1010_0100,
}

impl Instruction {
    /// Number of operand bytes following the opcode
    pub fn arity(self) -> usize {
        (u8::from(self) >> 6) as usize
    }

    /// Number of bytes the whole instruction occupies
    pub fn len(self) -> Address {
        1 + self.arity()
    }

    pub fn is_alu(self) -> bool {
        u8::from(self) & 0b0010_0000 != 0
    }

    pub fn sets_pc(self) -> bool {
        u8::from(self) & 0b0001_0000 != 0
    }

    /// The ALU operation carried out by this instruction
    pub fn alu_op(self) -> Result<AluOp> {
        match self {
            Instruction::ADD => Ok(AluOp::Add),
            Instruction::MUL => Ok(AluOp::Mul),
            other => Err(Fault::UnsupportedOperation {
                name: other.name().to_owned(),
            }),
        }
    }
}
