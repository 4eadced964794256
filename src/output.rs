use std::io;

/// Line oriented sink for the values printed by the program
pub trait Output {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl<W: io::Write> Output for W {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self, "{}", line)
    }
}
