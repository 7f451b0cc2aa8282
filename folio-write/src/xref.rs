//! Building and writing the cross-reference table.

use crate::error::{Error, Result};
use crate::log::{ldebug, lwarn};
use folio_object::{MAX_GENERATION, Reference};
use std::io::Write;

/// The length of one entry in the cross-reference table, including the line ending.
pub const XREF_ENTRY_LEN: usize = 20;

// Offsets are written with ten digits.
const MAX_OFFSET: u64 = 9_999_999_999;

/// An in-use object and the byte offset it was written at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefItem {
    /// The reference of the object.
    pub reference: Reference,
    /// The offset of the object in the file.
    pub offset: u64,
}

#[derive(Debug, Clone, Copy)]
enum Entry {
    InUse(XRefItem),
    Free(Reference),
}

impl Entry {
    fn obj_number(&self) -> u32 {
        match self {
            Self::InUse(item) => item.reference.obj_number(),
            Self::Free(reference) => reference.obj_number(),
        }
    }
}

/// A run of consecutive object numbers `first..first + count`, each of which is either in
/// use or free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XRefBlock {
    first: u32,
    count: u32,
    items: Vec<XRefItem>,
    free_items: Vec<Reference>,
}

impl XRefBlock {
    fn new(entry: Entry) -> Self {
        let mut block = Self {
            first: entry.obj_number(),
            count: 1,
            items: Vec::new(),
            free_items: Vec::new(),
        };
        block.put(entry);

        block
    }

    /// The first object number of the block.
    pub fn first(&self) -> u32 {
        self.first
    }

    /// The number of object numbers in the block.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The in-use objects, sorted by object number.
    pub fn items(&self) -> &[XRefItem] {
        &self.items
    }

    /// The free objects, sorted by object number.
    pub fn free_items(&self) -> &[Reference] {
        &self.free_items
    }

    fn end(&self) -> u64 {
        u64::from(self.first) + u64::from(self.count)
    }

    fn contains(&self, obj_number: u32) -> bool {
        self.first <= obj_number && u64::from(obj_number) < self.end()
    }

    /// Try to extend the block by the entry at its back or front.
    fn try_extend(&mut self, entry: Entry) -> bool {
        let num = entry.obj_number();

        if u64::from(num) == self.end() {
            self.count += 1;
        } else if num.checked_add(1) == Some(self.first) {
            self.first = num;
            self.count += 1;
        } else {
            return false;
        }

        self.put(entry);

        true
    }

    /// Replace the entry of an object number the block already covers.
    fn replace(&mut self, entry: Entry) {
        let num = entry.obj_number();
        self.items.retain(|i| i.reference.obj_number() != num);
        self.free_items.retain(|r| r.obj_number() != num);
        self.put(entry);
    }

    fn put(&mut self, entry: Entry) {
        match entry {
            Entry::InUse(item) => {
                let idx = self
                    .items
                    .partition_point(|i| i.reference.obj_number() < item.reference.obj_number());
                self.items.insert(idx, item);
            }
            Entry::Free(reference) => {
                let idx = self
                    .free_items
                    .partition_point(|r| r.obj_number() < reference.obj_number());
                self.free_items.insert(idx, reference);
            }
        }
    }
}

/// Collects the offsets of written objects and writes them as a cross-reference table.
///
/// Consecutive object numbers are grouped into blocks, regardless of whether they are in
/// use or free, so that the table ends up with as few subsections as possible.
#[derive(Debug, Clone, Default)]
pub struct XRefTable {
    blocks: Vec<XRefBlock>,
    max_obj_number: u32,
    offset: Option<u64>,
}

impl XRefTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object that is in use.
    ///
    /// Objects without an offset were not written. They don't get an entry, but still count
    /// towards [`XRefTable::size`].
    pub fn add_in_use_object(&mut self, reference: Reference, offset: Option<u64>) {
        self.max_obj_number = self.max_obj_number.max(reference.obj_number());

        if let Some(offset) = offset {
            self.insert(Entry::InUse(XRefItem { reference, offset }));
        }
    }

    /// Add a free object. Its generation is the one the next object with this number gets.
    pub fn add_free_object(&mut self, reference: Reference) {
        self.max_obj_number = self.max_obj_number.max(reference.obj_number());
        self.insert(Entry::Free(reference));
    }

    /// The value of the `/Size` entry of the trailer: the highest object number seen plus one.
    pub fn size(&self) -> u32 {
        self.max_obj_number.saturating_add(1)
    }

    /// The blocks collected so far, sorted by their first object number.
    pub fn blocks(&self) -> &[XRefBlock] {
        &self.blocks
    }

    /// The offset the table was written at, once it was written.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    fn insert(&mut self, entry: Entry) {
        let num = entry.obj_number();

        // Blocks never have gaps, so a number inside of a block was added before.
        if let Some(block) = self.blocks.iter_mut().find(|b| b.contains(num)) {
            block.replace(entry);
            return;
        }

        for block in &mut self.blocks {
            if block.try_extend(entry) {
                return;
            }
        }

        self.blocks.push(XRefBlock::new(entry));
        self.blocks.sort_by_key(|b| b.first);
    }

    /// Coalesce blocks that directly follow each other.
    pub fn merge_blocks(&mut self) -> Result<()> {
        if self.blocks.is_empty() {
            return Err(Error::NoXRef);
        }

        let mut merged: Vec<XRefBlock> = Vec::with_capacity(self.blocks.len());

        for block in std::mem::take(&mut self.blocks) {
            if let Some(prev) = merged.last_mut()
                && prev.end() == u64::from(block.first)
            {
                prev.count += block.count;
                prev.items.extend(block.items);
                prev.items.sort_by_key(|i| i.reference.obj_number());
                prev.free_items.extend(block.free_items);
                prev.free_items.sort_by_key(Reference::obj_number);
            } else {
                merged.push(block);
            }
        }

        self.blocks = merged;

        Ok(())
    }

    /// Merge the blocks and write the table, starting with the `xref` keyword, to the end
    /// of `out`.
    ///
    /// The entry for object 0 heads the list of free objects. It is merged into the first
    /// subsection if that one starts at object 0 or 1 and gets its own subsection otherwise.
    /// Each free entry points to the next free object number, the last one to 0.
    pub fn write(&mut self, out: &mut Vec<u8>) -> Result<()> {
        self.merge_blocks()?;
        self.offset = Some(out.len() as u64);

        let free_numbers = self
            .blocks
            .iter()
            .flat_map(|b| b.free_items.iter().map(Reference::obj_number))
            .filter(|n| *n != 0)
            .collect::<Vec<_>>();
        let mut next_free = free_numbers.iter().copied().skip(1).chain([0]);
        let head = free_numbers.first().copied().unwrap_or(0);

        ldebug!(
            "writing xref table with {} blocks and {} free objects",
            self.blocks.len(),
            free_numbers.len()
        );

        out.extend_from_slice(b"xref\n");

        if self.blocks[0].first > 1 {
            out.extend_from_slice(b"0 1\n");
            write_entry(out, u64::from(head), MAX_GENERATION, b'f')?;
        }

        for block in &self.blocks {
            let (first, count) = if block.first == 1 {
                (0, block.count + 1)
            } else {
                (block.first, block.count)
            };

            writeln!(out, "{first} {count}")?;

            if first == 0 {
                write_entry(out, u64::from(head), MAX_GENERATION, b'f')?;
            }

            let mut items = block.items.iter().peekable();
            let mut free_items = block.free_items.iter().peekable();

            loop {
                let take_item = match (items.peek(), free_items.peek()) {
                    (Some(item), Some(free)) => item.reference.obj_number() < free.obj_number(),
                    (Some(_), None) => true,
                    (None, Some(_)) => false,
                    (None, None) => break,
                };

                if take_item {
                    let Some(item) = items.next() else { break };

                    if item.reference.obj_number() == 0 {
                        lwarn!("object 0 can't be in use, replacing it with the free list head");
                        continue;
                    }

                    write_entry(out, item.offset, item.reference.gen_number(), b'n')?;
                } else {
                    let Some(free) = free_items.next() else { break };

                    if free.obj_number() == 0 {
                        continue;
                    }

                    let next = next_free.next().unwrap_or(0);
                    write_entry(out, u64::from(next), free.gen_number(), b'f')?;
                }
            }
        }

        Ok(())
    }
}

fn write_entry(out: &mut Vec<u8>, offset: u64, gen_number: u16, kind: u8) -> Result<()> {
    if offset > MAX_OFFSET {
        return Err(folio_object::Error::ValueOutOfRange.into());
    }

    write!(out, "{offset:010} {gen_number:05} ")?;
    out.extend_from_slice(&[kind, b' ', b'\n']);

    Ok(())
}
