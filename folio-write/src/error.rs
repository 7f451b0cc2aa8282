//! Error types for writing PDF files.

use core::fmt;
use std::io;

/// A specialized [`Result`] type for write operations.
pub type Result<T> = core::result::Result<T, Error>;

/// An error encountered while writing a PDF file.
#[derive(Debug)]
pub enum Error {
    /// The cross-reference table has no entries at all.
    NoXRef,
    /// An object could not be accessed or is malformed.
    Object(folio_object::Error),
    /// Writing to the output failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoXRef => f.write_str("cross-reference table has no entries"),
            Self::Object(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "failed to write output: {e}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::NoXRef => None,
            Self::Object(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<folio_object::Error> for Error {
    fn from(value: folio_object::Error) -> Self {
        Self::Object(value)
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
