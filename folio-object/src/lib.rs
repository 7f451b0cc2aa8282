/*!
An arena of indirect PDF objects.

A PDF document is a graph of objects that point to each other through references of the
form `12 0 R`. This crate models that graph with an [`ObjectStore`], which owns every
indirect object and hands out [`Reference`]s as the only way to address them. Since objects
never own each other, cyclic documents (like a page pointing back to its parent) need no
special treatment.

On top of creating, looking up and removing objects, the store keeps track of freed object
numbers and their generation numbers, can delete everything that is unreachable from a set
of roots and renumber the rest, and can merge the objects of a different store into itself.

## Example
```
use folio_object::{Dict, ObjectStore, Reference};

let mut store = ObjectStore::new();
let pages = store.create_object(Some("Pages"));
let catalog = store.create_object(Some("Catalog"));
store
    .must_get_object_mut(catalog)?
    .dict_mut()?
    .insert("Pages", pages);

let unused = store.create_from_value(Dict::new());
let renumbering = store.renumber_and_collect([catalog], [], true)?;

assert_eq!(store.len(), 2);
assert_eq!(renumbering.get(unused), None);
assert_eq!(renumbering.get(catalog), Some(Reference::new(2, 0)));
# Ok::<(), folio_object::Error>(())
```

## Features
- `logging`: Emit log messages via the `log` crate.
*/

#![forbid(unsafe_code)]

mod error;
mod indirect;
mod log;
pub mod object;
mod reference;
mod store;

pub use error::{Error, Result};
pub use indirect::{IndirectObject, StoreId};
pub use object::dict::keys;
pub use object::{Array, Dict, Name, Object, ObjectKind, PdfString, Stream};
pub use reference::{MAX_GENERATION, MAX_OBJECT_NUMBER, Reference};
pub use store::{MemoryStreamFactory, ObjectStore, Renumbering, StreamFactory};
