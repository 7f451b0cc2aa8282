//! Indirect objects, i.e. the elements owned by an object store.

use crate::error::Result;
use crate::object::{Dict, Object, Stream};
use crate::reference::Reference;
use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque identifier of an [`ObjectStore`](crate::ObjectStore).
///
/// Objects only remember which store they belong to through this id, they never own or
/// borrow the store itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

impl StoreId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);

        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An object stored under a reference, together with its optional stream.
#[derive(Debug, PartialEq)]
pub struct IndirectObject {
    reference: Reference,
    value: Object,
    stream: Option<Stream>,
    dirty: bool,
    owner: Option<StoreId>,
}

impl IndirectObject {
    /// Create a new detached object.
    ///
    /// New objects start out dirty, since they were never written.
    pub fn new(reference: Reference, value: Object) -> Self {
        Self {
            reference,
            value,
            stream: None,
            dirty: true,
            owner: None,
        }
    }

    /// The reference of the object.
    pub fn reference(&self) -> Reference {
        self.reference
    }

    /// The value of the object.
    pub fn value(&self) -> &Object {
        &self.value
    }

    /// The value of the object, for modification. Marks the object as dirty.
    pub fn value_mut(&mut self) -> &mut Object {
        self.dirty = true;
        &mut self.value
    }

    /// Replace the value of the object. Marks the object as dirty.
    pub fn set_value(&mut self, value: impl Into<Object>) {
        self.dirty = true;
        self.value = value.into();
    }

    /// The value as a dictionary, or an `InvalidDataType` error.
    pub fn dict(&self) -> Result<&Dict> {
        self.value.must_dict()
    }

    /// The value as a mutable dictionary, or an `InvalidDataType` error. Marks the object
    /// as dirty on success.
    pub fn dict_mut(&mut self) -> Result<&mut Dict> {
        let dict = self.value.must_dict_mut()?;
        self.dirty = true;

        Ok(dict)
    }

    /// The stream of the object, if it has one.
    pub fn stream(&self) -> Option<&Stream> {
        self.stream.as_ref()
    }

    /// The stream of the object, created empty if it doesn't exist yet. Marks the object as
    /// dirty.
    pub fn stream_mut(&mut self) -> &mut Stream {
        self.dirty = true;
        self.stream.get_or_insert_with(Stream::default)
    }

    /// Attach a stream, replacing an existing one. Marks the object as dirty.
    pub fn set_stream(&mut self, stream: Stream) {
        self.dirty = true;
        self.stream = Some(stream);
    }

    /// Detach the stream. Marks the object as dirty if there was one.
    pub fn take_stream(&mut self) -> Option<Stream> {
        let stream = self.stream.take();
        self.dirty |= stream.is_some();

        stream
    }

    /// Whether the object was modified since it was loaded or last written.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set or clear the dirty flag.
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// The store the object is attached to, if any.
    pub fn owner(&self) -> Option<StoreId> {
        self.owner
    }

    /// Split the object into its value and stream.
    pub fn into_parts(self) -> (Object, Option<Stream>) {
        (self.value, self.stream)
    }

    pub(crate) fn attach(&mut self, owner: StoreId, reference: Reference) {
        self.owner = Some(owner);
        self.reference = reference;
    }

    pub(crate) fn detach(mut self) -> Self {
        self.owner = None;
        self
    }

    /// Rewrite the value without touching the dirty flag. Used by whole-store passes that
    /// rebuild every object anyway.
    pub(crate) fn value_mut_untracked(&mut self) -> &mut Object {
        &mut self.value
    }
}

// Copies carry the payload, but not the association with the owning store.
impl Clone for IndirectObject {
    fn clone(&self) -> Self {
        Self {
            reference: self.reference,
            value: self.value.clone(),
            stream: self.stream.clone(),
            dirty: self.dirty,
            owner: None,
        }
    }
}
