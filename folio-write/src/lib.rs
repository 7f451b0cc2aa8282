/*!
Write an [`ObjectStore`](folio_object::ObjectStore) as a PDF file.

The [`Writer`] serializes every object of a store, records the byte offset of each one in an
[`XRefTable`] and finishes the file with the cross-reference table and the trailer. Objects
with a stream get their `/Length` entry filled in and are optionally compressed.

Since the store tracks which objects were modified, the writer can also produce incremental
updates that append only the changed objects to an existing file.

## Example
```
use folio_object::ObjectStore;
use folio_write::{Trailer, Writer};

let mut store = ObjectStore::new();
let pages = store.create_object(Some("Pages"));
let catalog = store.create_object(Some("Catalog"));
store
    .must_get_object_mut(catalog)?
    .dict_mut()?
    .insert("Pages", pages);

let mut out = Vec::new();
Writer::new(&mut store, Trailer::new(catalog)).write(&mut out)?;

assert!(out.starts_with(b"%PDF-1.7"));
assert!(out.ends_with(b"%%EOF\n"));
# Ok::<(), folio_write::Error>(())
```

## Features
- `logging`: Emit log messages via the `log` crate.
*/

#![forbid(unsafe_code)]

mod error;
mod log;
mod primitive;
mod version;
mod writer;
mod xref;

pub use error::{Error, Result};
pub use version::PdfVersion;
pub use writer::{Trailer, WriteObserver, WriteOptions, Writer};
pub use xref::{XREF_ENTRY_LEN, XRefBlock, XRefItem, XRefTable};
