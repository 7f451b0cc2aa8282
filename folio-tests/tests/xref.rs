use folio_object::Reference;
use folio_tests::{XRefLine, parse_xref};
use folio_write::{Error, XRefTable};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn r(num: u32) -> Reference {
    Reference::new(num, 0)
}

fn written(table: &mut XRefTable) -> (Vec<u8>, Vec<XRefLine>) {
    let mut out = Vec::new();
    table.write(&mut out).unwrap();
    let lines = parse_xref(&out, 0);

    (out, lines)
}

fn ops() -> impl Strategy<Value = Vec<(u32, bool)>> {
    prop::collection::vec((1_u32..=60, any::<bool>()), 0..40)
}

proptest! {
    #[test]
    fn merged_blocks_never_touch(ops in ops()) {
        let mut table = XRefTable::new();

        for (num, free) in ops {
            if free {
                table.add_free_object(Reference::new(num, 1));
            } else {
                table.add_in_use_object(r(num), Some(u64::from(num) * 10));
            }
        }

        if table.merge_blocks().is_err() {
            prop_assert!(table.blocks().is_empty());
            return Ok(());
        }

        let blocks = table.blocks();

        for pair in blocks.windows(2) {
            prop_assert!(pair[0].first() + pair[0].count() < pair[1].first());
        }

        for block in blocks {
            prop_assert_eq!(
                block.items().len() + block.free_items().len(),
                block.count() as usize
            );
        }
    }

    #[test]
    fn free_chain_visits_every_free_object(ops in ops()) {
        let mut table = XRefTable::new();
        let mut free = BTreeSet::new();

        for (num, is_free) in ops {
            if is_free {
                table.add_free_object(Reference::new(num, 2));
                free.insert(num);
            } else {
                table.add_in_use_object(r(num), Some(100));
                free.remove(&num);
            }
        }

        let mut out = Vec::new();

        if table.write(&mut out).is_err() {
            prop_assert!(free.is_empty());
            return Ok(());
        }

        let by_number = parse_xref(&out, 0)
            .into_iter()
            .map(|l| (l.obj_number, l))
            .collect::<BTreeMap<_, _>>();

        let mut visited = BTreeSet::new();
        let mut current = by_number[&0].value as u32;

        while current != 0 {
            let line = by_number[&current];
            prop_assert!(!line.in_use);
            prop_assert!(visited.insert(current), "free chain has a cycle");
            current = line.value as u32;
        }

        prop_assert_eq!(visited, free);
    }
}

#[test]
fn single_block_with_free_object() {
    let mut table = XRefTable::new();

    for (num, offset) in [(1, 100), (2, 140), (3, 180), (5, 300), (6, 340)] {
        table.add_in_use_object(r(num), Some(offset));
    }

    table.add_free_object(Reference::new(4, 1));
    table.merge_blocks().unwrap();

    assert_eq!(table.blocks().len(), 1);
    assert_eq!(table.blocks()[0].first(), 1);
    assert_eq!(table.blocks()[0].count(), 6);
    assert_eq!(table.size(), 7);

    let (_, lines) = written(&mut table);
    let entries = lines
        .iter()
        .skip(1)
        .map(|l| (l.obj_number, l.in_use, l.value, l.gen_number))
        .collect::<Vec<_>>();

    assert_eq!(
        entries,
        vec![
            (1, true, 100, 0),
            (2, true, 140, 0),
            (3, true, 180, 0),
            (4, false, 0, 1),
            (5, true, 300, 0),
            (6, true, 340, 0),
        ]
    );
}

#[test]
fn unwritten_object_counts_towards_size() {
    let mut table = XRefTable::new();
    table.add_in_use_object(r(1), Some(15));
    table.add_in_use_object(r(10), None);

    assert_eq!(table.size(), 11);

    let (out, lines) = written(&mut table);
    assert!(lines.iter().all(|l| l.obj_number != 10));
    assert_eq!(out, b"xref\n0 2\n0000000000 65535 f \n0000000015 00000 n \n");
}

#[test]
fn separate_subsections() {
    let mut table = XRefTable::new();
    table.add_in_use_object(r(3), Some(10));
    table.add_in_use_object(r(4), Some(20));
    table.add_in_use_object(r(8), Some(30));

    let (out, _) = written(&mut table);

    assert_eq!(
        out,
        b"xref\n\
          0 1\n0000000000 65535 f \n\
          3 2\n0000000010 00000 n \n0000000020 00000 n \n\
          8 1\n0000000030 00000 n \n"
    );
}

#[test]
fn empty_table() {
    let mut table = XRefTable::new();
    table.add_in_use_object(r(5), None);

    assert!(matches!(table.write(&mut Vec::new()), Err(Error::NoXRef)));
    assert_eq!(table.size(), 6);
}
