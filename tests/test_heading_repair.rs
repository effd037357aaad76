//! Property-based tests for heading hierarchy repair
//!
//! Repair is a single deterministic pass; these tests check that its output
//! is always a valid outline and that valid outlines pass through untouched.

use pdf_remediate::document::TaggedDocument;
use pdf_remediate::remediation::headings::{is_valid_hierarchy, repair_headings, repair_levels};
use pdf_remediate::remediation::RunLog;
use pdf_remediate::structure::{headings_in_order, HeadingLevel, StructRole, StructureNode};
use proptest::prelude::*;

// Strategy for arbitrary declared heading levels
fn declared_levels() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=6, 0..40)
}

// Strategy for outlines that are already valid
fn valid_levels() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop_oneof![Just(-2i8), Just(-1), Just(0), Just(1)], 0..40).prop_map(
        |steps| {
            let mut levels = Vec::with_capacity(steps.len());
            let mut current = 1i8;
            for (i, step) in steps.into_iter().enumerate() {
                if i > 0 {
                    current = (current + step).clamp(1, 6);
                }
                levels.push(current as u8);
            }
            levels
        },
    )
}

proptest! {
    #[test]
    fn prop_repaired_outline_is_valid(levels in declared_levels()) {
        let repaired = repair_levels(&levels);
        prop_assert_eq!(repaired.len(), levels.len());
        prop_assert!(is_valid_hierarchy(&repaired));
    }

    #[test]
    fn prop_repair_never_deepens(levels in declared_levels()) {
        let repaired = repair_levels(&levels);
        for (declared, new) in levels.iter().zip(&repaired) {
            prop_assert!(new <= declared);
            prop_assert!(*new >= 1);
        }
    }

    #[test]
    fn prop_repair_is_idempotent(levels in declared_levels()) {
        let once = repair_levels(&levels);
        let twice = repair_levels(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_valid_outline_is_unchanged(levels in valid_levels()) {
        prop_assert!(is_valid_hierarchy(&levels));
        prop_assert_eq!(repair_levels(&levels), levels);
    }

    #[test]
    fn prop_tree_repair_matches_level_repair(levels in declared_levels()) {
        let mut doc = TaggedDocument::new();
        let root = doc.tree.root();
        for level in &levels {
            let role = StructRole::Heading(HeadingLevel::new(*level).unwrap());
            doc.tree.append_child(root, StructureNode::new(role)).unwrap();
        }

        let mut log = RunLog::new();
        repair_headings(&mut doc, &mut log).unwrap();

        let actual: Vec<u8> = headings_in_order(&doc.tree).iter().map(|(_, l)| l.get()).collect();
        let expected = repair_levels(&levels);
        let changed = levels.iter().zip(&expected).filter(|(a, b)| a != b).count();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(log.stats.headings_repaired, changed);
    }
}

#[test]
fn test_documented_examples() {
    assert_eq!(repair_levels(&[2, 4, 4, 6]), vec![1, 2, 2, 3]);
    assert_eq!(repair_levels(&[1, 2, 3]), vec![1, 2, 3]);
    assert_eq!(repair_levels(&[3, 1, 5]), vec![1, 1, 2]);
    // In-bounds heading lowered after a deeper section closes
    assert_eq!(repair_levels(&[1, 4, 3]), vec![1, 2, 2]);
}

#[test]
fn test_nested_headings_use_document_order() {
    // Document
    //   ├─ Sect
    //   │   ├─ H3
    //   │   └─ Sect
    //   │       └─ H5
    //   └─ H3
    let mut doc = TaggedDocument::new();
    let root = doc.tree.root();
    let h = |level: u8| StructureNode::new(StructRole::Heading(HeadingLevel::new(level).unwrap()));

    let sect = doc.tree.append_child(root, StructureNode::new(StructRole::Other("Sect".into()))).unwrap();
    let first = doc.tree.append_child(sect, h(3)).unwrap();
    let inner = doc.tree.append_child(sect, StructureNode::new(StructRole::Other("Sect".into()))).unwrap();
    let deep = doc.tree.append_child(inner, h(5)).unwrap();
    let last = doc.tree.append_child(root, h(3)).unwrap();

    let mut log = RunLog::new();
    repair_headings(&mut doc, &mut log).unwrap();

    let level = |id| doc.tree.node(id).unwrap().role.heading_level().unwrap().get();
    assert_eq!(level(first), 1);
    assert_eq!(level(deep), 2);
    assert_eq!(level(last), 1);
    assert_eq!(log.stats.headings_repaired, 3);
}
