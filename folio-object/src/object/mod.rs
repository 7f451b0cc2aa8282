//! The value model of PDF objects.

use crate::error::{Error, Result};
use crate::reference::Reference;
use std::fmt::{self, Display, Formatter};

pub mod array;
pub mod dict;
pub mod name;
pub mod stream;
pub mod string;

pub use array::Array;
pub use dict::Dict;
pub use name::Name;
pub use stream::Stream;
pub use string::PdfString;

/// The kind of an [`Object`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A null object.
    Null,
    /// A boolean.
    Boolean,
    /// An integer number.
    Integer,
    /// A real number.
    Real,
    /// A string.
    String,
    /// A name.
    Name,
    /// An array.
    Array,
    /// A dictionary.
    Dict,
    /// A reference to an indirect object.
    Reference,
    /// Pre-serialized data.
    RawData,
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::String => "string",
            Self::Name => "name",
            Self::Array => "array",
            Self::Dict => "dictionary",
            Self::Reference => "reference",
            Self::RawData => "raw data",
        };

        f.write_str(name)
    }
}

/// A PDF object.
///
/// Dictionaries and arrays own their entries, but other indirect objects are only ever
/// pointed to through [`Object::Reference`]. A reference stored inside of an object is never
/// resolved implicitly, use [`ObjectStore::resolve`](crate::ObjectStore::resolve) for that.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Object {
    /// A null object.
    #[default]
    Null,
    /// A boolean object.
    Boolean(bool),
    /// An integer object.
    Integer(i64),
    /// A real object.
    Real(f64),
    /// A string object.
    String(PdfString),
    /// A name object.
    Name(Name),
    /// An array object.
    Array(Array),
    /// A dictionary object.
    Dict(Dict),
    /// A reference to an indirect object.
    Reference(Reference),
    /// Data that is written to the output as-is.
    RawData(Vec<u8>),
}

macro_rules! accessors {
    ($variant:ident, $t:ty, $as:ident, $as_mut:ident, $must:ident, $must_mut:ident) => {
        #[doc = concat!("Return the ", stringify!($variant), " payload, if the object is one.")]
        pub fn $as(&self) -> Option<&$t> {
            match self {
                Self::$variant(v) => Some(v),
                _ => None,
            }
        }

        #[doc = concat!("Return the ", stringify!($variant), " payload mutably, if the object is one.")]
        pub fn $as_mut(&mut self) -> Option<&mut $t> {
            match self {
                Self::$variant(v) => Some(v),
                _ => None,
            }
        }

        #[doc = concat!("Return the ", stringify!($variant), " payload or fail with `InvalidDataType`.")]
        pub fn $must(&self) -> Result<&$t> {
            let found = self.kind();

            self.$as().ok_or(Error::InvalidDataType {
                expected: ObjectKind::$variant,
                found,
            })
        }

        #[doc = concat!("Return the ", stringify!($variant), " payload mutably or fail with `InvalidDataType`.")]
        pub fn $must_mut(&mut self) -> Result<&mut $t> {
            let found = self.kind();

            self.$as_mut().ok_or(Error::InvalidDataType {
                expected: ObjectKind::$variant,
                found,
            })
        }
    };
}

impl Object {
    /// The kind of the object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Null => ObjectKind::Null,
            Self::Boolean(_) => ObjectKind::Boolean,
            Self::Integer(_) => ObjectKind::Integer,
            Self::Real(_) => ObjectKind::Real,
            Self::String(_) => ObjectKind::String,
            Self::Name(_) => ObjectKind::Name,
            Self::Array(_) => ObjectKind::Array,
            Self::Dict(_) => ObjectKind::Dict,
            Self::Reference(_) => ObjectKind::Reference,
            Self::RawData(_) => ObjectKind::RawData,
        }
    }

    /// Whether the object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    accessors!(Dict, Dict, as_dict, as_dict_mut, must_dict, must_dict_mut);
    accessors!(Array, Array, as_array, as_array_mut, must_array, must_array_mut);
    accessors!(Name, Name, as_name, as_name_mut, must_name, must_name_mut);
    accessors!(
        String,
        PdfString,
        as_string,
        as_string_mut,
        must_string,
        must_string_mut
    );

    /// Return the boolean value, if the object is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Return the integer value, if the object is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Return the integer value or fail with `InvalidDataType`.
    pub fn must_i64(&self) -> Result<i64> {
        self.as_i64().ok_or(Error::InvalidDataType {
            expected: ObjectKind::Integer,
            found: self.kind(),
        })
    }

    /// Return the numeric value, if the object is an integer or a real.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Return the reference, if the object is one.
    pub fn as_reference(&self) -> Option<Reference> {
        match self {
            Self::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Return the reference or fail with `InvalidDataType`.
    pub fn must_reference(&self) -> Result<Reference> {
        self.as_reference().ok_or(Error::InvalidDataType {
            expected: ObjectKind::Reference,
            found: self.kind(),
        })
    }

    /// Call `f` for every reference nested anywhere in this object, including the object
    /// itself.
    pub fn walk_references(&self, f: &mut impl FnMut(Reference)) {
        match self {
            Self::Reference(r) => f(*r),
            Self::Array(array) => {
                for item in array.iter() {
                    item.walk_references(f);
                }
            }
            Self::Dict(dict) => {
                for value in dict.values() {
                    value.walk_references(f);
                }
            }
            _ => {}
        }
    }

    /// Call `f` with every object slot holding a reference, so that it can be rewritten in
    /// place. Stops at the first error.
    pub fn walk_references_mut(
        &mut self,
        f: &mut impl FnMut(&mut Self) -> Result<()>,
    ) -> Result<()> {
        if matches!(self, Self::Reference(_)) {
            return f(self);
        }

        match self {
            Self::Array(array) => {
                for item in array.iter_mut() {
                    item.walk_references_mut(f)?;
                }

                Ok(())
            }
            Self::Dict(dict) => {
                for value in dict.values_mut() {
                    value.walk_references_mut(f)?;
                }

                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Shift the object number of every nested reference by `offset`.
    ///
    /// `0 0 R` is left alone. Fails with `ValueOutOfRange` if a shifted number would not be
    /// a valid object number anymore, in which case the object may be partially updated.
    pub fn fix_references(&mut self, offset: i64) -> Result<()> {
        if offset == 0 {
            return Ok(());
        }

        self.walk_references_mut(&mut |slot| {
            if let Self::Reference(r) = slot
                && r.is_indirect()
            {
                let shifted = i64::from(r.obj_number()) + offset;
                let obj_number = u32::try_from(shifted)
                    .ok()
                    .filter(|n| *n != 0)
                    .ok_or(Error::ValueOutOfRange)?;

                *r = Reference::new(obj_number, r.gen_number());
            }

            Ok(())
        })
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Object {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Object {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f32> for Object {
    fn from(value: f32) -> Self {
        Self::Real(f64::from(value))
    }
}

impl From<f64> for Object {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<PdfString> for Object {
    fn from(value: PdfString) -> Self {
        Self::String(value)
    }
}

impl From<Name> for Object {
    fn from(value: Name) -> Self {
        Self::Name(value)
    }
}

impl From<Array> for Object {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Dict> for Object {
    fn from(value: Dict) -> Self {
        Self::Dict(value)
    }
}

impl From<Reference> for Object {
    fn from(value: Reference) -> Self {
        Self::Reference(value)
    }
}
