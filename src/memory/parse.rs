//! Loader for LS-8 program images. Every line holds at most one byte written
//! as a base-2 literal, everything after a `#` is a comment:
//!
//! ```text
//! # print8.ls8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::ops::Deref;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use super::Byte;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadErrorKind {
    #[error("unreadable program source")]
    Unreadable,
    #[error("invalid binary literal")]
    InvalidLiteral,
    #[error("literal does not fit into a byte")]
    LiteralTooWide,
}

/// 1-based line of the source, `0` when the error is not tied to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineNr(usize);

impl fmt::Display for LineNr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => Ok(()),
            line_nr => write!(f, "[ln: {}]: ", line_nr),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Context(Option<Cow<'static, str>>);

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(context) => write!(f, " - {}", context),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line_nr}{kind}{context}")]
pub struct LoadError {
    kind: LoadErrorKind,
    context: Context,
    line_nr: LineNr,
}

impl LoadError {
    fn new<C, S>(kind: LoadErrorKind, context: C, line_nr: usize) -> Self
    where
        C: Into<Option<S>>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            kind,
            context: Context(context.into().map(|inner| inner.into())),
            line_nr: LineNr(line_nr),
        }
    }

    /// Folds several line errors into one, keeping the first kind and line.
    fn collect(mut errors: Vec<LoadError>) -> Self {
        if errors.len() == 1 {
            return errors.remove(0);
        }

        let context = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        let first = &errors[0];

        Self::new(first.kind.clone(), context, first.line_nr.0)
    }

    pub fn kind(&self) -> &LoadErrorKind {
        &self.kind
    }

    pub fn line_nr(&self) -> usize {
        self.line_nr.0
    }
}

pub type Result<T, E = LoadError> = std::result::Result<T, E>;

/// Bytes of a program image in load order
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Program {
    bytes: Vec<Byte>,
}

impl Program {
    /// Reads and parses the program image at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|err| {
            LoadError::new(
                LoadErrorKind::Unreadable,
                format!("`{}`: {}", path.display(), err),
                0,
            )
        })?;

        data.parse()
    }

    pub fn bytes(&self) -> &[Byte] {
        &self.bytes
    }
}

impl Deref for Program {
    type Target = [Byte];

    fn deref(&self) -> &Self::Target {
        &self.bytes
    }
}

impl From<Vec<Byte>> for Program {
    fn from(bytes: Vec<Byte>) -> Self {
        Self { bytes }
    }
}

impl FromStr for Program {
    type Err = LoadError;

    /// Parses every line of `data`.
    ///
    /// # Errors
    ///
    /// All malformed lines are collected and returned as one error.
    fn from_str(data: &str) -> Result<Self> {
        let mut bytes = Vec::new();
        let mut errors = Vec::new();

        for (idx, line) in data.lines().enumerate() {
            match parse_line(line, idx + 1) {
                Ok(Some(byte)) => bytes.push(byte),
                Ok(None) => {}
                Err(err) => {
                    log::error!("{}", err);
                    errors.push(err);
                }
            }
        }

        if errors.is_empty() {
            log::debug!("Parsed {} bytes", bytes.len());
            Ok(Self { bytes })
        } else {
            Err(LoadError::collect(errors))
        }
    }
}

/// Parses a single line. Blank and comment-only lines yield `None`.
///
/// # Examples
///
/// - `10000010 # LDI R0,8`
/// - `0b00000001`
fn parse_line(line: &str, line_nr: usize) -> Result<Option<Byte>> {
    let content = line.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(None);
    }

    let digits = content.strip_prefix("0b").unwrap_or(content);
    if digits.is_empty() || !digits.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(LoadError::new(
            LoadErrorKind::InvalidLiteral,
            format!("`{}`", content),
            line_nr,
        ));
    }

    // Leading zeros are allowed, the value itself must fit into a byte
    let significant = digits.trim_start_matches('0');
    if significant.len() > 8 {
        return Err(LoadError::new(
            LoadErrorKind::LiteralTooWide,
            format!("`{}`", content),
            line_nr,
        ));
    }
    if significant.is_empty() {
        return Ok(Some(0));
    }

    let value = Byte::from_str_radix(significant, 2).map_err(|_| {
        LoadError::new(
            LoadErrorKind::InvalidLiteral,
            format!("`{}`", content),
            line_nr,
        )
    })?;

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::Result;

    #[test]
    fn parse_print8() -> Result<()> {
        let data = r#"
            # Print the number 8

            10000010 # LDI R0,8
            00000000
            00001000
            01000111 # PRN R0
            00000000
            00000001 # HLT
        "#;

        let program = Program::from_str(data)?;

        assert_eq!(
            program.bytes(),
            &[0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001]
        );

        Ok(())
    }

    #[test]
    fn parse_prefixed_and_padded_literals() -> Result<()> {
        let program: Program = "0b101\n  0000000011111111  \n#only a comment\n0".parse()?;

        assert_eq!(program.bytes(), &[5, 255, 0]);

        Ok(())
    }

    #[test]
    fn parse_empty_source() -> Result<()> {
        let program: Program = "\n   \n# nothing here\n".parse()?;

        assert!(program.is_empty());

        Ok(())
    }

    #[test]
    fn parse_reports_malformed_lines() -> Result<()> {
        let data = "00000001\n0102 # not binary\n111111111\n";

        let err = Program::from_str(data).unwrap_err();

        assert_eq!(err.kind(), &LoadErrorKind::InvalidLiteral);
        assert_eq!(err.line_nr(), 2);
        let message = err.to_string();
        assert!(message.contains("[ln: 2]"));
        assert!(message.contains("[ln: 3]"));
        assert!(message.contains("does not fit into a byte"));

        Ok(())
    }

    #[test]
    fn load_error_messages() -> Result<()> {
        let err = Program::from_str("00000001\n2\n").unwrap_err();
        assert_eq!(err.to_string(), "[ln: 2]: invalid binary literal - `2`");

        let err = LoadError::new::<Option<&'static str>, &'static str>(
            LoadErrorKind::Unreadable,
            None,
            0,
        );
        assert_eq!(err.to_string(), "unreadable program source");

        let err = LoadError::new(LoadErrorKind::LiteralTooWide, "`111111111`", 0);
        assert_eq!(
            err.to_string(),
            "literal does not fit into a byte - `111111111`"
        );

        Ok(())
    }

    #[test]
    fn parse_missing_file() -> Result<()> {
        let err = Program::from_file("programs/does-not-exist.ls8").unwrap_err();

        assert_eq!(err.kind(), &LoadErrorKind::Unreadable);

        Ok(())
    }
}
