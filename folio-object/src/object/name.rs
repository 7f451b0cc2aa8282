//! Names.

use std::borrow::Borrow;
use std::fmt::{self, Debug, Formatter};
use std::ops::Deref;

/// A PDF name, stored without the leading slash and with escapes already resolved.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Name(Vec<u8>);

impl Name {
    /// Create a new name from its (unescaped) bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    /// Return the name as a string, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl Deref for Name {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Name {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// `Ord` on `Vec<u8>` and `[u8]` agree, so names can be looked up by byte slices.
impl Borrow<[u8]> for Name {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&[u8]> for Name {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "/{s}"),
            None => write!(f, "/{:?}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Name;

    #[test]
    fn lookup_by_slice() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Name::from("Type"), 1);

        assert_eq!(map.get(b"Type".as_slice()), Some(&1));
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", Name::from("Catalog")), "/Catalog");
    }
}
