//! Merging the objects of one store into another.

use crate::error::{Error, Result};
use crate::log::ldebug;
use crate::reference::{MAX_OBJECT_NUMBER, Reference};
use crate::store::{ObjectStore, check_number};

impl ObjectStore {
    /// Copy every object of `other` into this store and return the offset that was added to
    /// their object numbers.
    ///
    /// With `adjust_numbers`, the offset is this store's high-water mark, so the copies can't
    /// collide with anything in this store. References inside the copies are shifted by the
    /// same offset, and the free numbers of `other` are registered as well. Without it,
    /// objects keep their numbers and a collision fails with `InternalLogic`. Shifting a
    /// number above [`MAX_OBJECT_NUMBER`] fails with `ValueOutOfRange`.
    ///
    /// On error, the store is left untouched.
    pub fn append(&mut self, other: &Self, adjust_numbers: bool) -> Result<u32> {
        let offset = if adjust_numbers {
            self.high_water_mark()
        } else {
            0
        };

        let mut copies = Vec::with_capacity(other.len());

        for obj in other.iter() {
            let reference = shift(obj.reference(), offset)?;

            if self.is_in_use(reference.obj_number()) {
                return Err(Error::InternalLogic("appended object collides with existing one"));
            }

            let mut copy = obj.clone();
            copy.value_mut_untracked()
                .fix_references(i64::from(offset))?;
            copies.push((reference, copy));
        }

        let free = other
            .free_objects()
            .iter()
            .map(|r| shift(*r, offset))
            .collect::<Result<Vec<_>>>()?;
        let high_water_mark = offset
            .checked_add(other.high_water_mark())
            .filter(|n| *n <= MAX_OBJECT_NUMBER)
            .ok_or(Error::ValueOutOfRange)?;

        ldebug!(
            "appending {} objects at offset {}",
            copies.len(),
            offset
        );

        for (reference, mut copy) in copies {
            copy.set_dirty(true);
            self.attach_at(reference, copy);
        }

        for reference in free {
            self.register_free(reference);
        }

        self.object_count = self.object_count.max(high_water_mark);

        Ok(offset)
    }
}

fn shift(reference: Reference, offset: u32) -> Result<Reference> {
    let obj_number = reference
        .obj_number()
        .checked_add(offset)
        .ok_or(Error::ValueOutOfRange)?;
    check_number(obj_number)?;

    Ok(Reference::new(obj_number, reference.gen_number()))
}
