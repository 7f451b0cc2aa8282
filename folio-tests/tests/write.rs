use crate::document;
use folio_object::{Name, ObjectStore, Reference, Stream};
use folio_tests::{find, inflate, object_at, parse_xref, startxref, stream_data, trailer};
use folio_write::{PdfVersion, Trailer, WriteObserver, WriteOptions, Writer};

fn write(store: &mut ObjectStore, root: Reference, options: WriteOptions) -> Vec<u8> {
    let mut out = Vec::new();
    Writer::with_options(store, Trailer::new(root), options)
        .write(&mut out)
        .unwrap();

    out
}

fn check_offsets(file: &[u8], xref_offset: usize) {
    for line in parse_xref(file, xref_offset).iter().filter(|l| l.in_use) {
        let header = format!("{} {} obj\n", line.obj_number, line.gen_number);
        let object = object_at(file, line.value as usize);

        assert!(
            object.starts_with(header.as_bytes()),
            "object {} is not at offset {}",
            line.obj_number,
            line.value
        );
    }
}

#[test]
fn offsets_point_to_objects() {
    let (mut store, catalog) = document(5);
    let file = write(&mut store, catalog, WriteOptions::default());

    let xref_offset = startxref(&file);
    assert!(file[xref_offset..].starts_with(b"xref\n"));
    check_offsets(&file, xref_offset);

    let lines = parse_xref(&file, xref_offset);
    assert_eq!(lines.len(), 8);
    assert_eq!(trailer(&file, xref_offset), "<</Root 1 0 R /Size 8>>");
}

#[test]
fn reused_numbers_are_written_with_generation() {
    let (mut store, catalog) = document(3);
    store.remove_object(Reference::new(5, 0), true);
    store.remove_object(Reference::new(4, 0), true);
    let reused = store.create_from_value(Name::new("Reused"));
    assert_eq!(reused, Reference::new(4, 1));

    let file = write(&mut store, catalog, WriteOptions::default());
    let xref_offset = startxref(&file);
    check_offsets(&file, xref_offset);

    let lines = parse_xref(&file, xref_offset);
    assert_eq!(lines[0].value, 5);
    assert_eq!((lines[4].in_use, lines[4].gen_number), (true, 1));
    assert_eq!((lines[5].in_use, lines[5].value, lines[5].gen_number), (false, 0, 1));
    assert!(find(&file, b"4 1 obj\n/Reused\nendobj\n").is_some());
}

#[test]
fn write_after_collect() {
    let (mut store, catalog) = document(2);
    store.create_object(Some("Unused"));
    store.remove_object(Reference::new(3, 0), true);

    store.renumber_and_collect([catalog], [], true).unwrap();
    let file = write(&mut store, catalog, WriteOptions::default());
    let xref_offset = startxref(&file);

    check_offsets(&file, xref_offset);
    assert!(find(&file, b"/Unused").is_none());
    assert!(parse_xref(&file, xref_offset).iter().skip(1).all(|l| l.in_use));
    assert!(find(&file, b"<</Count 2 /Kids [null 3 0 R] /Type /Pages>>").is_some());
}

#[test]
fn streams_are_compressed() {
    let (mut store, catalog) = document(1);
    let content = store.create_object(None);
    let data = b"BT /F1 24 Tf 100 700 Td (Hello) Tj ET\n".repeat(10);
    store.create_stream(content).unwrap().set_data(data.clone());

    let file = write(&mut store, catalog, WriteOptions::default());
    let xref_offset = startxref(&file);
    let line = parse_xref(&file, xref_offset)[content.obj_number() as usize];
    let object = object_at(&file, line.value as usize);

    let encoded = stream_data(object);
    let expected = format!("<</Filter /FlateDecode /Length {}>>", encoded.len());

    assert!(find(object, expected.as_bytes()).is_some());
    assert_eq!(inflate(encoded), data);
}

#[test]
fn streams_are_left_alone() {
    let (mut store, catalog) = document(1);
    let content = store.create_object(None);
    store.create_stream(content).unwrap().set_data(b"0 g".to_vec());

    let options = WriteOptions {
        version: PdfVersion::Pdf20,
        compress_streams: false,
    };
    let file = write(&mut store, catalog, options);

    assert!(file.starts_with(b"%PDF-2.0\n"));
    assert!(find(&file, b"4 0 obj\n<</Length 3>>\nstream\n0 g\nendstream\nendobj\n").is_some());
}

#[test]
fn incremental_update() {
    let (mut store, catalog) = document(2);
    store.set_reuse_allowed(false);
    let original = write(&mut store, catalog, WriteOptions::default());
    let prev_xref = startxref(&original);

    // Replace the second page with a new one.
    let tree = Reference::new(2, 0);
    store.remove_object(Reference::new(4, 0), true);
    let page = store.create_object(Some("Page"));
    store
        .must_get_object_mut(page)
        .unwrap()
        .dict_mut()
        .unwrap()
        .insert("Parent", tree);
    store
        .must_get_object_mut(tree)
        .unwrap()
        .dict_mut()
        .unwrap()
        .insert("Kids", folio_object::Array::from_iter([Reference::new(3, 0), page]));

    let mut out = Vec::new();
    Writer::new(&mut store, Trailer::new(catalog))
        .write_update(&original, prev_xref as u64, &mut out)
        .unwrap();

    assert!(out.starts_with(&original));

    let xref_offset = startxref(&out);
    assert!(xref_offset > original.len());
    check_offsets(&out, xref_offset);

    let updated = parse_xref(&out, xref_offset)
        .iter()
        .filter(|l| l.in_use)
        .map(|l| l.obj_number)
        .collect::<Vec<_>>();
    assert_eq!(updated, vec![2, 5]);
    assert!(
        parse_xref(&out, xref_offset)
            .iter()
            .any(|l| l.obj_number == 4 && !l.in_use && l.gen_number == 1)
    );
    assert_eq!(
        trailer(&out, xref_offset),
        format!("<</Prev {prev_xref} /Root 1 0 R /Size 6>>")
    );

    // The previous section is still intact.
    check_offsets(&out, prev_xref);
}

#[test]
fn removed_objects_are_freed_in_update() {
    let (mut store, catalog) = document(2);
    store.set_reuse_allowed(false);
    let original = write(&mut store, catalog, WriteOptions::default());
    let prev_xref = startxref(&original);

    let removed = Reference::new(4, 0);
    store.remove_object(removed, true).unwrap();
    store
        .must_get_object_mut(Reference::new(2, 0))
        .unwrap()
        .dict_mut()
        .unwrap()
        .insert("Kids", folio_object::Array::from_iter([Reference::new(3, 0)]));

    let mut out = Vec::new();
    Writer::new(&mut store, Trailer::new(catalog))
        .write_update(&original, prev_xref as u64, &mut out)
        .unwrap();

    let lines = parse_xref(&out, startxref(&out));
    let entry = lines.iter().find(|l| l.obj_number == 4).unwrap();
    assert!(!entry.in_use);
    assert_eq!(entry.gen_number, 1);
    assert_eq!(lines[0].value, 4);

    // The previous section still lists the object, the update overrides it.
    let previous = parse_xref(&out, prev_xref);
    assert!(previous.iter().any(|l| l.obj_number == 4 && l.in_use));
    assert!(store.removed_objects().is_empty());
}

#[test]
fn failed_update_leaves_output_alone() {
    let (mut store, catalog) = document(1);
    let original = write(&mut store, catalog, WriteOptions::default());

    let mut out = b"%header".to_vec();
    let result = Writer::new(&mut store, Trailer::new(catalog)).write_update(
        &original,
        startxref(&original) as u64,
        &mut out,
    );

    assert!(matches!(result, Err(folio_write::Error::NoXRef)));
    assert_eq!(out, b"%header");
}

#[test]
fn update_after_update() {
    let (mut store, catalog) = document(1);
    let first = write(&mut store, catalog, WriteOptions::default());

    store
        .must_get_object_mut(Reference::new(3, 0))
        .unwrap()
        .dict_mut()
        .unwrap()
        .insert("Rotate", 90);

    let mut second = Vec::new();
    Writer::new(&mut store, Trailer::new(catalog))
        .write_update(&first, startxref(&first) as u64, &mut second)
        .unwrap();

    store
        .must_get_object_mut(catalog)
        .unwrap()
        .dict_mut()
        .unwrap()
        .insert("Lang", folio_object::PdfString::new("en"));

    let mut third = Vec::new();
    Writer::new(&mut store, Trailer::new(catalog))
        .write_update(&second, startxref(&second) as u64, &mut third)
        .unwrap();

    let xref_offset = startxref(&third);
    let in_use = parse_xref(&third, xref_offset)
        .iter()
        .filter(|l| l.in_use)
        .map(|l| l.obj_number)
        .collect::<Vec<_>>();

    assert_eq!(in_use, vec![1]);
    assert!(trailer(&third, xref_offset).contains(&format!("/Prev {}", startxref(&second))));
}

#[derive(Default)]
struct Sizes {
    objects: Vec<(Reference, u64)>,
    open: Option<Reference>,
    streams: Vec<(Reference, usize)>,
}

impl WriteObserver for Sizes {
    fn begin_object(&mut self, reference: Reference, offset: u64) {
        assert_eq!(self.open, None);
        self.open = Some(reference);
        self.objects.push((reference, offset));
    }

    fn end_object(&mut self, reference: Reference) {
        assert_eq!(self.open.take(), Some(reference));
    }

    fn end_stream(&mut self, reference: Reference, len: usize) {
        assert_eq!(self.open, Some(reference));
        self.streams.push((reference, len));
    }
}

#[test]
fn observers_match_xref() {
    let (mut store, catalog) = document(2);
    let content = store.create_object(None);
    store
        .must_get_object_mut(content)
        .unwrap()
        .set_stream(Stream::new(b"1 0 0 RG".to_vec()));

    let mut sizes = Sizes::default();
    let mut out = Vec::new();
    let mut writer = Writer::with_options(
        &mut store,
        Trailer::new(catalog),
        WriteOptions {
            compress_streams: false,
            ..WriteOptions::default()
        },
    );
    writer.observe(&mut sizes);
    writer.write(&mut out).unwrap();

    let expected = parse_xref(&out, startxref(&out))
        .iter()
        .filter(|l| l.in_use)
        .map(|l| (Reference::new(l.obj_number, l.gen_number), l.value))
        .collect::<Vec<_>>();

    assert_eq!(sizes.objects, expected);
    assert_eq!(sizes.streams, vec![(content, 8)]);
}

#[test]
fn write_to_sink() {
    let (mut store, catalog) = document(1);
    let mut trailer = Trailer::new(catalog);
    trailer.id = Some([vec![1, 2, 3], vec![4, 5, 6]]);

    let mut sink = std::io::Cursor::new(Vec::new());
    Writer::new(&mut store, trailer)
        .write_to(&mut sink)
        .unwrap();
    let file = sink.into_inner();

    assert!(find(&file, b"/ID [<010203> <040506>]").is_some());
    assert!(file.ends_with(b"%%EOF\n"));
    assert!(store.dirty_references().is_empty());
}
