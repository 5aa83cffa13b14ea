//! The `errors` module defines the common error types.

use std::error;
use std::fmt;
use std::io;

use super::Result;

/// `Error` provides an enumeration of all possible errors reported by this crate.
#[derive(Debug)]
pub enum Error {
    /// An IO error occurred while reading or writing a trajectory file.
    IoError(io::Error),
    /// A CSV row could not be parsed.
    CsvError(csv::Error),
    /// The input contained malformed or out-of-range data.
    ParseError(&'static str),
    /// The caller violated a documented precondition (e.g. non-finite coordinates).
    PreconditionError(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => err.fmt(f),
            Error::CsvError(ref err) => err.fmt(f),
            Error::ParseError(ref msg) => write!(f, "Malformed input encountered: {}", msg),
            Error::PreconditionError(ref msg) => write!(f, "Precondition violated: {}", msg),
        }
    }
}

impl error::Error for Error {
    fn cause(&self) -> Option<&dyn error::Error> {
        match *self {
            Error::IoError(ref err) => Some(err),
            Error::CsvError(ref err) => Some(err),
            Error::ParseError(_) => None,
            Error::PreconditionError(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Error {
        Error::CsvError(err)
    }
}

/// function to create a parse error.
pub fn parse_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::ParseError(desc))
}

/// function to create a precondition error.
pub fn precondition_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::PreconditionError(desc))
}
