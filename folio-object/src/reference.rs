//! References to indirect objects.

use std::fmt::{self, Debug, Display, Formatter};

/// The largest generation number. It is reserved for the head of the free list
/// and for object numbers that must never be reused again.
pub const MAX_GENERATION: u16 = u16::MAX;

/// The largest object number a store accepts from outside, the implementation limit
/// of PDF readers.
pub const MAX_OBJECT_NUMBER: u32 = 8_388_607;

/// A reference to an indirect object.
///
/// This is the only handle code outside of an [`ObjectStore`](crate::ObjectStore)
/// holds on to. Ordering is by object number first and generation number second.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub struct Reference {
    obj_number: u32,
    gen_number: u16,
}

impl Reference {
    /// Create a new reference.
    pub const fn new(obj_number: u32, gen_number: u16) -> Self {
        Self {
            obj_number,
            gen_number,
        }
    }

    /// The object number.
    pub const fn obj_number(&self) -> u32 {
        self.obj_number
    }

    /// The generation number.
    pub const fn gen_number(&self) -> u16 {
        self.gen_number
    }

    /// Whether this actually points to an indirect object, i.e. is not `0 0 R`.
    pub const fn is_indirect(&self) -> bool {
        self.obj_number != 0 || self.gen_number != 0
    }
}

impl Debug for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.obj_number, self.gen_number)
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}
