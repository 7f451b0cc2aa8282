//! Serializing a whole object store.

use crate::error::Result;
use crate::log::{ldebug, ltrace};
use crate::primitive::{WriteDirect, deflate_encode};
use crate::version::PdfVersion;
use crate::xref::XRefTable;
use folio_object::keys::{FILTER, FLATE_DECODE, ID, INFO, LENGTH, PREV, ROOT, SIZE};
use folio_object::{Array, Dict, IndirectObject, Name, Object, ObjectStore, PdfString, Reference};
use std::io::Write;

/// Settings for writing a PDF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// The version written into the header.
    ///
    /// Default: [`PdfVersion::Pdf17`].
    pub version: PdfVersion,
    /// Whether streams without a `/Filter` entry are compressed with `FlateDecode`.
    ///
    /// Default: `true`.
    pub compress_streams: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            version: PdfVersion::default(),
            compress_streams: true,
        }
    }
}

/// The entries of the trailer dictionary that are not derived from the cross-reference
/// table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailer {
    /// The document catalog.
    pub root: Reference,
    /// The document information dictionary.
    pub info: Option<Reference>,
    /// The two parts of the file identifier.
    pub id: Option<[Vec<u8>; 2]>,
}

impl Trailer {
    /// Create a trailer that only points to the document catalog.
    pub fn new(root: Reference) -> Self {
        Self {
            root,
            info: None,
            id: None,
        }
    }
}

/// Receives notifications about the progress of a [`Writer`].
///
/// All methods do nothing by default.
pub trait WriteObserver {
    /// An object is about to be written at the given byte offset.
    fn begin_object(&mut self, _reference: Reference, _offset: u64) {}
    /// An object, including its stream, was written.
    fn end_object(&mut self, _reference: Reference) {}
    /// The stream of an object is about to be written.
    fn begin_stream(&mut self, _reference: Reference) {}
    /// The stream of an object was written with `len` bytes of (possibly encoded) data.
    fn end_stream(&mut self, _reference: Reference, _len: usize) {}
}

/// Writes the objects of a store as a PDF file.
///
/// After a successful write, all objects of the store are marked as clean, so a following
/// [`Writer::write_update`] only contains what changed in between.
pub struct Writer<'a> {
    store: &'a mut ObjectStore,
    options: WriteOptions,
    trailer: Trailer,
    observers: Vec<&'a mut dyn WriteObserver>,
}

impl<'a> Writer<'a> {
    /// Create a new writer with default options.
    pub fn new(store: &'a mut ObjectStore, trailer: Trailer) -> Self {
        Self::with_options(store, trailer, WriteOptions::default())
    }

    /// Create a new writer with the given options.
    pub fn with_options(store: &'a mut ObjectStore, trailer: Trailer, options: WriteOptions) -> Self {
        Self {
            store,
            options,
            trailer,
            observers: Vec::new(),
        }
    }

    /// Register an observer that is notified about every object that gets written.
    pub fn observe(&mut self, observer: &'a mut dyn WriteObserver) {
        self.observers.push(observer);
    }

    /// The trailer entries, for modification between writes.
    pub fn trailer_mut(&mut self) -> &mut Trailer {
        &mut self.trailer
    }

    /// Write a complete file to the end of `out`.
    ///
    /// Fails with `NoObject` if the document catalog is not part of the store. On error,
    /// `out` is truncated to its previous length.
    pub fn write(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let len = out.len();
        let result = self.write_file(out);

        if result.is_err() {
            out.truncate(len);
        }

        result
    }

    fn write_file(&mut self, out: &mut Vec<u8>) -> Result<()> {
        self.store.must_get_object(self.trailer.root)?;

        let version = self.options.version;
        ldebug!(
            "writing PDF {}.{} with {} objects",
            version.major(),
            version.minor(),
            self.store.len()
        );

        let start = out.len() as u64;
        writeln!(out, "%PDF-{}.{}", version.major(), version.minor())?;
        // Binary marker, so that transfer programs don't treat the file as text.
        out.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let mut xref = XRefTable::new();

        for obj in self.store.iter() {
            let offset = out.len() as u64 - start;
            write_object(obj, offset, &self.options, &mut self.observers, out)?;
            xref.add_in_use_object(obj.reference(), Some(offset));
        }

        self.finish(xref, start, None, out)
    }

    /// Append an incremental update of the file `original` to the end of `out`.
    ///
    /// The original file is copied first, followed by every object that changed since it was
    /// loaded or last written. `prev_xref` is the byte offset of the cross-reference table of
    /// `original` and ends up as the `/Prev` entry of the new trailer. Since an update may
    /// only append to a file, reuse of object numbers should be disabled on the store while
    /// editing. Objects removed since then are marked as free in the new section.
    ///
    /// Fails with `NoXRef` if nothing changed. On error, `out` is truncated to its previous
    /// length.
    pub fn write_update(&mut self, original: &[u8], prev_xref: u64, out: &mut Vec<u8>) -> Result<()> {
        let len = out.len();
        let result = self.write_update_file(original, prev_xref, out);

        if result.is_err() {
            out.truncate(len);
        }

        result
    }

    fn write_update_file(
        &mut self,
        original: &[u8],
        prev_xref: u64,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        self.store.must_get_object(self.trailer.root)?;

        let start = out.len() as u64;
        out.extend_from_slice(original);

        if !original.ends_with(b"\n") {
            out.push(b'\n');
        }

        let mut xref = XRefTable::new();
        let mut written = 0_usize;

        for obj in self.store.iter() {
            if obj.is_dirty() {
                let offset = out.len() as u64 - start;
                write_object(obj, offset, &self.options, &mut self.observers, out)?;
                xref.add_in_use_object(obj.reference(), Some(offset));
                written += 1;
            } else {
                xref.add_in_use_object(obj.reference(), None);
            }
        }

        ldebug!(
            "writing incremental update with {} of {} objects",
            written,
            self.store.len()
        );

        self.finish(xref, start, Some(prev_xref), out)
    }

    /// Write a complete file to `sink`.
    pub fn write_to(&mut self, sink: &mut impl Write) -> Result<()> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        sink.write_all(&out)?;

        Ok(())
    }

    fn finish(
        &mut self,
        mut xref: XRefTable,
        start: u64,
        prev_xref: Option<u64>,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        if prev_xref.is_some() {
            // Otherwise a reader following `/Prev` would still find them in use.
            for removed in self.store.removed_objects() {
                xref.add_free_object(*removed);
            }
        }

        for free in self.store.free_objects() {
            xref.add_free_object(*free);
        }

        let mut table = Vec::new();
        xref.write(&mut table)?;

        let xref_offset = out.len() as u64 - start;
        out.extend_from_slice(&table);

        let mut size = xref.size();

        // Numbers removed since the previous section must stay below `/Size`.
        if prev_xref.is_some() {
            size = size.max(self.store.high_water_mark().saturating_add(1));
        }

        let mut trailer = Dict::new();
        trailer.insert(SIZE, size);
        trailer.insert(ROOT, self.trailer.root);

        if let Some(info) = self.trailer.info {
            trailer.insert(INFO, info);
        }

        if let Some([first, second]) = &self.trailer.id {
            trailer.insert(
                ID,
                Array::from_iter([
                    PdfString::new_hex(first.clone()),
                    PdfString::new_hex(second.clone()),
                ]),
            );
        }

        if let Some(prev_xref) = prev_xref {
            let prev_xref =
                i64::try_from(prev_xref).map_err(|_| folio_object::Error::ValueOutOfRange)?;
            trailer.insert(PREV, Object::Integer(prev_xref));
        }

        out.extend_from_slice(b"trailer\n");
        trailer.write_direct(out);
        write!(out, "\nstartxref\n{xref_offset}\n%%EOF\n")?;

        self.store.clear_dirty();

        Ok(())
    }
}

fn write_object(
    obj: &IndirectObject,
    offset: u64,
    options: &WriteOptions,
    observers: &mut [&mut dyn WriteObserver],
    out: &mut Vec<u8>,
) -> Result<()> {
    let reference = obj.reference();

    ltrace!("writing object {} at {}", reference, offset);

    for observer in observers.iter_mut() {
        observer.begin_object(reference, offset);
    }

    writeln!(
        out,
        "{} {} obj",
        reference.obj_number(),
        reference.gen_number()
    )?;

    match obj.stream() {
        Some(stream) => {
            let mut dict = obj.dict()?.clone();
            let encoded;

            let data = if options.compress_streams && !dict.contains_key(FILTER) {
                encoded = deflate_encode(stream.data())?;
                dict.insert(FILTER, Name::new(FLATE_DECODE));
                encoded.as_slice()
            } else {
                stream.data()
            };

            dict.insert(LENGTH, Object::Integer(data.len() as i64));
            dict.write_direct(out);

            for observer in observers.iter_mut() {
                observer.begin_stream(reference);
            }

            out.extend_from_slice(b"\nstream\n");
            out.extend_from_slice(data);
            out.extend_from_slice(b"\nendstream");

            for observer in observers.iter_mut() {
                observer.end_stream(reference, data.len());
            }
        }
        None => obj.value().write_direct(out),
    }

    out.extend_from_slice(b"\nendobj\n");

    for observer in observers.iter_mut() {
        observer.end_object(reference);
    }

    Ok(())
}
