use folio_object::{ObjectStore, Reference};

mod write;
mod xref;

/// A catalog pointing to a page tree with `pages` empty pages.
fn document(pages: usize) -> (ObjectStore, Reference) {
    let mut store = ObjectStore::new();
    let catalog = store.create_object(Some("Catalog"));
    let tree = store.create_object(Some("Pages"));

    let kids = (0..pages)
        .map(|_| {
            let page = store.create_object(Some("Page"));
            store
                .must_get_object_mut(page)
                .unwrap()
                .dict_mut()
                .unwrap()
                .insert("Parent", tree);

            page
        })
        .collect::<folio_object::Array>();

    let dict = store.must_get_object_mut(tree).unwrap().dict_mut().unwrap();
    dict.insert("Count", pages as i64);
    dict.insert("Kids", kids);

    store
        .must_get_object_mut(catalog)
        .unwrap()
        .dict_mut()
        .unwrap()
        .insert("Pages", tree);

    (store, catalog)
}
