//! The object store, an arena owning every indirect object of a document.

use crate::error::{Error, Result};
use crate::indirect::{IndirectObject, StoreId};
use crate::log::lwarn;
use crate::object::dict::keys::TYPE;
use crate::object::{Dict, Name, Object, Stream};
use crate::reference::{MAX_GENERATION, MAX_OBJECT_NUMBER, Reference};
use std::fmt::{self, Debug, Formatter};

mod append;
mod collect;

pub use collect::Renumbering;

/// Creates the streams that get attached to objects through
/// [`ObjectStore::create_stream`].
///
/// Writers that stream content directly to their output can inject their own factory
/// when constructing the store.
pub trait StreamFactory {
    /// Create a new stream for the object `parent`.
    fn create_stream(&self, parent: Reference) -> Stream;
}

/// A stream factory that creates empty in-memory streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryStreamFactory;

impl StreamFactory for MemoryStreamFactory {
    fn create_stream(&self, _: Reference) -> Stream {
        Stream::default()
    }
}

/// An arena owning all indirect objects of a document.
///
/// Objects are addressed by their object number, code outside of the store only ever holds
/// [`Reference`]s. The store hands out object numbers itself, reusing freed numbers unless
/// reuse was disabled with [`ObjectStore::set_reuse_allowed`].
pub struct ObjectStore {
    id: StoreId,
    // Indexed by object number, slot 0 is never used.
    slots: Vec<Option<IndirectObject>>,
    // Sorted by object number, at most one entry per number. The generation of an entry is
    // the one the next object with that number gets.
    free: Vec<Reference>,
    // Numbers removed since the last write, sorted like `free` but never handed out again.
    removed: Vec<Reference>,
    // The highest object number that was ever handed out or registered.
    object_count: u32,
    live: usize,
    reuse_allowed: bool,
    stream_factory: Box<dyn StreamFactory>,
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ObjectStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore")
            .field("id", &self.id)
            .field("live", &self.live)
            .field("object_count", &self.object_count)
            .field("free", &self.free)
            .field("removed", &self.removed)
            .field("reuse_allowed", &self.reuse_allowed)
            .finish_non_exhaustive()
    }
}

impl ObjectStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::with_stream_factory(Box::new(MemoryStreamFactory))
    }

    /// Create a new empty store that creates streams with the given factory.
    pub fn with_stream_factory(stream_factory: Box<dyn StreamFactory>) -> Self {
        Self {
            id: StoreId::next(),
            slots: vec![None],
            free: Vec::new(),
            removed: Vec::new(),
            object_count: 0,
            live: 0,
            reuse_allowed: true,
            stream_factory,
        }
    }

    /// The id objects of this store are tagged with.
    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Whether the object belongs to this store.
    pub fn owns(&self, obj: &IndirectObject) -> bool {
        obj.owner() == Some(self.id)
    }

    /// Create a new empty dictionary, optionally with a `/Type` entry, and return its
    /// reference.
    pub fn create_object(&mut self, type_hint: Option<&str>) -> Reference {
        let mut dict = Dict::new();

        if let Some(type_hint) = type_hint {
            dict.insert(TYPE, Name::new(type_hint));
        }

        self.create_from_value(dict)
    }

    /// Store a value under a new reference and return it.
    ///
    /// The returned object number is guaranteed not to be in use.
    pub fn create_from_value(&mut self, value: impl Into<Object>) -> Reference {
        let reference = self.allocate();
        self.attach_at(reference, IndirectObject::new(reference, value.into()));

        reference
    }

    /// Store a value under a reference chosen by the caller, like a parser populating the
    /// store does. The object starts out clean.
    ///
    /// Fails with `ValueOutOfRange` for object number 0 and numbers above
    /// [`MAX_OBJECT_NUMBER`].
    pub fn insert_object(&mut self, reference: Reference, value: impl Into<Object>) -> Result<()> {
        check_number(reference.obj_number())?;

        if self.is_in_use(reference.obj_number()) {
            return Err(Error::InternalLogic("object number is already in use"));
        }

        let mut obj = IndirectObject::new(reference, value.into());
        obj.set_dirty(false);
        self.attach_at(reference, obj);

        Ok(())
    }

    /// Return the object stored under the reference, if there is one.
    ///
    /// The generation number has to match. Nested references are not resolved.
    pub fn get_object(&self, reference: Reference) -> Option<&IndirectObject> {
        self.slots
            .get(reference.obj_number() as usize)?
            .as_ref()
            .filter(|obj| obj.reference() == reference)
    }

    /// Return the object stored under the reference mutably, if there is one.
    pub fn get_object_mut(&mut self, reference: Reference) -> Option<&mut IndirectObject> {
        self.slots
            .get_mut(reference.obj_number() as usize)?
            .as_mut()
            .filter(|obj| obj.reference() == reference)
    }

    /// Return the object stored under the reference, or a `NoObject` error.
    pub fn must_get_object(&self, reference: Reference) -> Result<&IndirectObject> {
        self.get_object(reference)
            .ok_or(Error::NoObject(reference))
    }

    /// Return the object stored under the reference mutably, or a `NoObject` error.
    pub fn must_get_object_mut(&mut self, reference: Reference) -> Result<&mut IndirectObject> {
        self.get_object_mut(reference)
            .ok_or(Error::NoObject(reference))
    }

    /// Resolve an object: a reference is looked up in the store, anything else is returned
    /// as is. Returns `None` for references to objects that don't exist.
    pub fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(r) => self.get_object(*r).map(IndirectObject::value),
            _ => Some(obj),
        }
    }

    /// Look up a dictionary entry and resolve it.
    pub fn resolve_key<'a>(&'a self, dict: &'a Dict, key: impl AsRef<[u8]>) -> Option<&'a Object> {
        self.resolve(dict.get(key)?)
    }

    /// Remove an object from the store and return it, detached from the store.
    ///
    /// If `mark_free` is set and reuse is allowed, the object number is put on the free list
    /// with an incremented generation number. Once the generation reaches 65535, the number
    /// stays on the free list but is never handed out again.
    ///
    /// Either way, the number is remembered until the next write, so that an incremental
    /// update can mark it as free. See [`ObjectStore::removed_objects`].
    pub fn remove_object(&mut self, reference: Reference, mark_free: bool) -> Option<IndirectObject> {
        let slot = self.slots.get_mut(reference.obj_number() as usize)?;

        if slot.as_ref()?.reference() != reference {
            return None;
        }

        let obj = slot.take()?;
        self.live -= 1;

        let next = Reference::new(
            reference.obj_number(),
            reference.gen_number().saturating_add(1),
        );
        insert_sorted(&mut self.removed, next);

        if mark_free && self.reuse_allowed {
            insert_sorted(&mut self.free, next);
        }

        Some(obj.detach())
    }

    /// Register a free object number, e.g. one found in the cross-reference table of a
    /// parsed file. The generation is the one the next object with this number gets.
    ///
    /// Fails with `ValueOutOfRange` for object number 0 and numbers above
    /// [`MAX_OBJECT_NUMBER`]. Otherwise ignored while reuse is disabled or if the number is
    /// in use.
    pub fn add_free_object(&mut self, reference: Reference) -> Result<()> {
        check_number(reference.obj_number())?;
        self.register_free(reference);

        Ok(())
    }

    /// Allow or forbid the reuse of freed object numbers.
    ///
    /// Forbidding reuse clears the free list, after which every new object gets a number
    /// that was never used before. This is needed for incremental updates, which may only
    /// append to a file.
    pub fn set_reuse_allowed(&mut self, allowed: bool) {
        self.reuse_allowed = allowed;

        if !allowed {
            self.free.clear();
        }
    }

    /// Whether freed object numbers are reused.
    pub fn is_reuse_allowed(&self) -> bool {
        self.reuse_allowed
    }

    /// The free object numbers, sorted, each with the generation its next use gets.
    pub fn free_objects(&self) -> &[Reference] {
        &self.free
    }

    /// The object numbers removed since the store was last written and not in use again,
    /// sorted, each with its incremented generation.
    ///
    /// Unlike [`ObjectStore::free_objects`], this is kept while reuse is disabled and never
    /// used for allocation.
    pub fn removed_objects(&self) -> &[Reference] {
        &self.removed
    }

    /// The number of objects in the store.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether the store contains no objects.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// The highest object number that was ever allocated or registered. This never
    /// decreases, except through [`ObjectStore::renumber_and_collect`].
    pub fn object_count(&self) -> u32 {
        self.object_count
    }

    /// The highest object number known to the store, in use or free.
    pub fn high_water_mark(&self) -> u32 {
        let highest_free = self.free.last().map_or(0, Reference::obj_number);

        self.object_count.max(highest_free)
    }

    /// Iterate over all objects in ascending order of their references.
    pub fn iter(&self) -> impl Iterator<Item = &IndirectObject> {
        self.slots.iter().flatten()
    }

    /// Iterate over the references of all objects in ascending order.
    pub fn references(&self) -> impl Iterator<Item = Reference> + '_ {
        self.iter().map(IndirectObject::reference)
    }

    /// The references of all objects modified since they were loaded or last written.
    pub fn dirty_references(&self) -> Vec<Reference> {
        self.iter()
            .filter(|obj| obj.is_dirty())
            .map(IndirectObject::reference)
            .collect()
    }

    /// Clear the dirty flag of every object and forget the removed object numbers.
    pub fn clear_dirty(&mut self) {
        for obj in self.slots.iter_mut().flatten() {
            obj.set_dirty(false);
        }

        self.removed.clear();
    }

    /// Create a stream for `parent` with the store's stream factory and attach it,
    /// replacing any existing stream.
    pub fn create_stream(&mut self, parent: Reference) -> Result<&mut Stream> {
        let stream = self.stream_factory.create_stream(parent);
        let obj = self.must_get_object_mut(parent)?;
        obj.set_stream(stream);

        Ok(obj.stream_mut())
    }

    fn is_in_use(&self, obj_number: u32) -> bool {
        self.slots
            .get(obj_number as usize)
            .is_some_and(Option::is_some)
    }

    fn allocate(&mut self) -> Reference {
        if self.reuse_allowed
            && let Some(idx) = self
                .free
                .iter()
                .position(|r| r.gen_number() < MAX_GENERATION)
        {
            return self.free.remove(idx);
        }

        // Registered numbers are capped at `MAX_OBJECT_NUMBER`, so the count only grows past
        // it one allocated slot at a time.
        self.object_count = self.object_count.saturating_add(1);

        Reference::new(self.object_count, 0)
    }

    // Assumes a valid object number.
    pub(crate) fn register_free(&mut self, reference: Reference) {
        if !self.reuse_allowed {
            return;
        }

        if self.is_in_use(reference.obj_number()) {
            lwarn!("ignoring free object {} that is in use", reference);
            return;
        }

        insert_sorted(&mut self.free, reference);
        self.object_count = self.object_count.max(reference.obj_number());
    }

    // The caller guarantees that the object number is not in use.
    fn attach_at(&mut self, reference: Reference, mut obj: IndirectObject) {
        let idx = reference.obj_number() as usize;

        if self.slots.len() <= idx {
            self.slots.resize_with(idx + 1, || None);
        }

        remove_sorted(&mut self.free, reference.obj_number());
        remove_sorted(&mut self.removed, reference.obj_number());

        obj.attach(self.id, reference);
        self.slots[idx] = Some(obj);
        self.live += 1;
        self.object_count = self.object_count.max(reference.obj_number());
    }
}

pub(crate) fn check_number(obj_number: u32) -> Result<()> {
    if obj_number == 0 || obj_number > MAX_OBJECT_NUMBER {
        return Err(Error::ValueOutOfRange);
    }

    Ok(())
}

// Keeps at most one entry per object number, a new entry replaces the old one.
fn insert_sorted(list: &mut Vec<Reference>, reference: Reference) {
    match list.binary_search_by_key(&reference.obj_number(), Reference::obj_number) {
        Ok(idx) => list[idx] = reference,
        Err(idx) => list.insert(idx, reference),
    }
}

fn remove_sorted(list: &mut Vec<Reference>, obj_number: u32) {
    if let Ok(idx) = list.binary_search_by_key(&obj_number, Reference::obj_number) {
        list.remove(idx);
    }
}
