use std::fmt::{Debug, Display, Formatter};
use std::{fmt, io, result};

#[derive(Debug)]
pub enum ErrorType {
    Terminal(crossterm::ErrorKind),
    Io(io::Error),
    Settings(String),
    /// Terminal size and the size the board needs, as (columns, rows)
    TerminalTooSmall { actual: (u16, u16), needed: (u16, u16) },
}

/// The second member contains a trace in reverse order
#[must_use]
pub struct Error(ErrorType, Vec<String>);

impl From<crossterm::ErrorKind> for Error {
    fn from(e: crossterm::ErrorKind) -> Self {
        Self(ErrorType::Terminal(e), vec![])
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self(ErrorType::Io(e), vec![])
    }
}

impl Error {
    pub fn settings<S: ToString>(message: S) -> Self {
        Self(ErrorType::Settings(message.to_string()), vec![])
    }

    pub fn terminal_too_small(actual: (u16, u16), needed: (u16, u16)) -> Self {
        Self(ErrorType::TerminalTooSmall { actual, needed }, vec![])
    }

    pub fn with_trace_step<S: ToString>(mut self, s: S) -> Self {
        self.1.push(s.to_string());
        self
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error:\n{:?}\nTrace:", self.0)?;
        for t in (self.1).iter().rev() {
            writeln!(f, " in {}", t)?;
        }
        Ok(())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ErrorType::Terminal(e) => write!(f, "terminal error: {}", e)?,
            ErrorType::Io(e) => write!(f, "i/o error: {}", e)?,
            ErrorType::Settings(s) => write!(f, "invalid settings: {}", s)?,
            ErrorType::TerminalTooSmall { actual, needed } => write!(
                f,
                "terminal is {}x{}, the board needs at least {}x{}",
                actual.0, actual.1, needed.0, needed.1
            )?,
        }
        for t in (self.1).iter().rev() {
            write!(f, "\n in {}", t)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

pub type Result<T = ()> = result::Result<T, Error>;

pub trait ErrorConversion {
    fn with_trace_step<S: ToString>(self, s: S) -> Self;
}

impl<T> ErrorConversion for Result<T> {
    fn with_trace_step<S: ToString>(self, s: S) -> Self {
        self.map_err(|e| e.with_trace_step(s.to_string()))
    }
}
