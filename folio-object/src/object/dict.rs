//! Dictionaries.

use crate::object::{Name, Object};
use crate::reference::Reference;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// A dictionary, mapping names to objects. Entries are kept sorted by key, which also
/// makes serialization deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dict(BTreeMap<Name, Object>);

impl Dict {
    /// Create a new empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries in the dictionary.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks whether the dictionary contains an entry with a specific key.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.0.contains_key(key.as_ref())
    }

    /// Returns the raw entry of a key. References are not resolved.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Object> {
        self.0.get(key.as_ref())
    }

    /// Returns the raw entry of a key mutably.
    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut Object> {
        self.0.get_mut(key.as_ref())
    }

    /// Get the object reference linked to a key.
    pub fn get_ref(&self, key: impl AsRef<[u8]>) -> Option<Reference> {
        self.get(key)?.as_reference()
    }

    /// Insert an entry, returning the previous value of that key.
    pub fn insert(&mut self, key: impl Into<Name>, value: impl Into<Object>) -> Option<Object> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove an entry.
    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Option<Object> {
        self.0.remove(key.as_ref())
    }

    /// An iterator over all entries in the dictionary, sorted by key.
    pub fn iter(&self) -> btree_map::Iter<'_, Name, Object> {
        self.0.iter()
    }

    /// Returns an iterator over all keys in the dictionary.
    pub fn keys(&self) -> btree_map::Keys<'_, Name, Object> {
        self.0.keys()
    }

    /// Returns an iterator over all values in the dictionary.
    pub fn values(&self) -> btree_map::Values<'_, Name, Object> {
        self.0.values()
    }

    /// Returns a mutable iterator over all values in the dictionary.
    pub fn values_mut(&mut self) -> btree_map::ValuesMut<'_, Name, Object> {
        self.0.values_mut()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a Name, &'a Object);
    type IntoIter = btree_map::Iter<'a, Name, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Dictionary keys used by the store and the writer.
pub mod keys {
    macro_rules! key {
        ($i:ident, $e:expr) => {
            #[allow(missing_docs)]
            pub const $i: &[u8] = $e;
        };
    }

    key!(CATALOG, b"Catalog");
    key!(COUNT, b"Count");
    key!(FILTER, b"Filter");
    key!(FLATE_DECODE, b"FlateDecode");
    key!(ID, b"ID");
    key!(INFO, b"Info");
    key!(KIDS, b"Kids");
    key!(LENGTH, b"Length");
    key!(PAGE, b"Page");
    key!(PAGES, b"Pages");
    key!(PARENT, b"Parent");
    key!(PREV, b"Prev");
    key!(ROOT, b"Root");
    key!(SIZE, b"Size");
    key!(TYPE, b"Type");
}
