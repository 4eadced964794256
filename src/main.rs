use std::io;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{bail, Result, WrapErr};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use ls8::error::Fault;
use ls8::memory::parse::Program;
use ls8::processor::{Exit, Processor};

/// LS-8 emulator
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Program image, one binary literal per line
    program: PathBuf,

    /// Log the machine state before every instruction
    #[arg(short, long)]
    trace: bool,

    /// Stop after this many instructions
    #[arg(long, value_name = "N")]
    max_cycles: Option<u64>,

    /// Verbosity of the log output
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    let args = Args::parse();

    let level = if args.trace {
        LevelFilter::Trace
    } else {
        args.log_level
    };
    SimpleLogger::new().with_level(level).init()?; // logging

    let program = Program::from_file(&args.program)
        .map_err(Fault::from)
        .wrap_err_with(|| format!("Failed to load `{}`", args.program.display()))?;

    let mut cpu = Processor::default();
    cpu.load_program(&program)
        .wrap_err("Program does not fit into memory")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cpu.run(&mut out, args.max_cycles).wrap_err("Machine fault")? {
        Exit::Halted => Ok(()),
        Exit::Suspended { cycles } => bail!("Program did not halt within {} cycles", cycles),
    }
}
