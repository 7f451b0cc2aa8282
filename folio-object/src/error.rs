//! Error types for object store operations.

use crate::object::ObjectKind;
use crate::reference::Reference;
use core::fmt;

/// A specialized [`Result`] type for object store operations.
pub type Result<T> = core::result::Result<T, Error>;

/// An error encountered while accessing or restructuring an object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No object is stored under the reference.
    NoObject(Reference),
    /// The object has a different type than the one that was requested.
    InvalidDataType {
        /// The kind the caller asked for.
        expected: ObjectKind,
        /// The kind the object actually has.
        found: ObjectKind,
    },
    /// A number left its valid range, e.g. an object number shifted below 1.
    ValueOutOfRange,
    /// An internal invariant was violated.
    InternalLogic(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoObject(r) => write!(f, "no object stored under {r}"),
            Self::InvalidDataType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::ValueOutOfRange => f.write_str("value out of range"),
            Self::InternalLogic(msg) => write!(f, "internal logic error: {msg}"),
        }
    }
}

impl core::error::Error for Error {}
