//! Garbage collection and renumbering.

use crate::error::{Error, Result};
use crate::log::{ldebug, lwarn};
use crate::object::Object;
use crate::reference::Reference;
use crate::store::ObjectStore;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// The mapping from old to new references produced by
/// [`ObjectStore::renumber_and_collect`].
#[derive(Debug, Clone, Default)]
pub struct Renumbering {
    map: FxHashMap<Reference, Reference>,
}

impl Renumbering {
    /// The new reference of an object, or `None` if it was collected or never existed.
    pub fn get(&self, old: Reference) -> Option<Reference> {
        self.map.get(&old).copied()
    }

    /// The number of surviving objects.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no object survived.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl ObjectStore {
    /// Optionally delete unreachable objects, then renumber all remaining ones.
    ///
    /// If `collect` is set, every object that can't be reached from `roots` or `keep_alive`
    /// by following references is deleted. Objects listed in `keep_alive` survive even when
    /// nothing refers to them, and so does everything they refer to. Afterwards, the surviving
    /// objects get the numbers `1..=n` with generation 0, in their current order, and every
    /// reference inside of them is rewritten accordingly. References to objects that don't
    /// exist are replaced with null, since their old number might now belong to a
    /// different object. The free list and the removed object numbers are cleared.
    ///
    /// On error, the store is left untouched.
    pub fn renumber_and_collect(
        &mut self,
        roots: impl IntoIterator<Item = Reference>,
        keep_alive: impl IntoIterator<Item = Reference>,
        collect: bool,
    ) -> Result<Renumbering> {
        for (idx, slot) in self.slots.iter().enumerate() {
            if let Some(obj) = slot
                && obj.reference().obj_number() as usize != idx
            {
                return Err(Error::InternalLogic("object is stored under the wrong number"));
            }
        }

        let reachable = collect.then(|| self.reachable(roots.into_iter().chain(keep_alive)));

        let mut map = FxHashMap::default();
        let mut next = 0_u32;

        for reference in self.references() {
            let alive = reachable
                .as_ref()
                .is_none_or(|reachable| reachable.contains(&reference));

            if alive {
                next += 1;
                map.insert(reference, Reference::new(next, 0));
            }
        }

        ldebug!(
            "renumbering {} objects, collecting {}",
            map.len(),
            self.live - map.len()
        );

        let mut slots = Vec::with_capacity(next as usize + 1);
        slots.push(None);

        for mut obj in std::mem::take(&mut self.slots).into_iter().flatten() {
            let Some(new_ref) = map.get(&obj.reference()).copied() else {
                continue;
            };

            rewrite_references(obj.value_mut_untracked(), &map);
            obj.attach(self.id, new_ref);
            obj.set_dirty(true);
            slots.push(Some(obj));
        }

        self.slots = slots;
        self.live = map.len();
        self.free.clear();
        self.removed.clear();
        self.object_count = next;

        Ok(Renumbering { map })
    }

    /// Flood-fill the object graph starting at `roots`.
    fn reachable(&self, roots: impl IntoIterator<Item = Reference>) -> FxHashSet<Reference> {
        let mut visited = FxHashSet::default();
        let mut worklist = roots.into_iter().collect::<Vec<_>>();

        while let Some(reference) = worklist.pop() {
            if !visited.insert(reference) {
                continue;
            }

            let Some(obj) = self.get_object(reference) else {
                lwarn!("reference {} points to a missing object", reference);
                continue;
            };

            let mut children = SmallVec::<[Reference; 8]>::new();
            obj.value().walk_references(&mut |r| children.push(r));

            worklist.extend(children.into_iter().filter(|r| !visited.contains(r)));
        }

        visited
    }
}

fn rewrite_references(obj: &mut Object, map: &FxHashMap<Reference, Reference>) {
    match obj {
        Object::Reference(r) => {
            let old = *r;

            *obj = match map.get(&old) {
                Some(new_ref) => Object::Reference(*new_ref),
                None if old.is_indirect() => {
                    lwarn!("replacing dangling reference {} with null", old);
                    Object::Null
                }
                None => Object::Reference(old),
            };
        }
        Object::Array(array) => {
            for item in array.iter_mut() {
                rewrite_references(item, map);
            }
        }
        Object::Dict(dict) => {
            for value in dict.values_mut() {
                rewrite_references(value, map);
            }
        }
        _ => {}
    }
}
