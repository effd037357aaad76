//! Heading hierarchy validation and repair.

use super::stats::RunLog;
use crate::document::DocumentModel;
use crate::error::Result;
use crate::structure::{headings_in_order, HeadingLevel, StructRole};

/// Whether a sequence of heading levels is a valid outline: it starts at 1 and
/// never goes more than one level deeper than the heading before.
pub fn is_valid_hierarchy(levels: &[u8]) -> bool {
    match levels.first() {
        None => true,
        Some(first) => *first == 1 && levels.windows(2).all(|w| w[1] <= w[0] + 1),
    }
}

/// Repaired levels for a sequence of declared heading levels.
///
/// One left-to-right pass over an outline stack of `(declared, repaired)` pairs.
/// For each heading, entries declared at the same depth or deeper are popped.
/// A popped entry with the same declared level is a sibling and lends its
/// repaired level; otherwise the heading nests one below whatever is left on the
/// stack, or becomes level 1 when the stack is empty.
///
/// Valid hierarchies are returned unchanged and repairing twice is the same as
/// repairing once. A heading that already sits within one level of its
/// predecessor can still be lowered: `[1, 4, 3]` becomes `[1, 2, 2]`, not
/// `[1, 2, 3]`, because the `3` closes the section opened by the `4` and nests
/// directly under the `1`. Clamping each heading against the previous one
/// instead would turn `[2, 4, 4, 6]` into `[1, 2, 3, 4]` rather than
/// `[1, 2, 2, 3]`.
///
/// ```
/// use pdf_remediate::remediation::headings::repair_levels;
///
/// assert_eq!(repair_levels(&[2, 4, 4, 6]), vec![1, 2, 2, 3]);
/// assert_eq!(repair_levels(&[1, 4, 3]), vec![1, 2, 2]);
/// ```
pub fn repair_levels(declared: &[u8]) -> Vec<u8> {
    let mut stack: Vec<(u8, u8)> = Vec::new();
    let mut repaired = Vec::with_capacity(declared.len());

    for &level in declared {
        let mut sibling = None;
        while let Some(&(top_declared, top_repaired)) = stack.last() {
            if top_declared < level {
                break;
            }
            if top_declared == level {
                sibling = Some(top_repaired);
            }
            stack.pop();
        }

        let new_level = sibling.unwrap_or_else(|| stack.last().map_or(1, |&(_, r)| r + 1));
        stack.push((level, new_level));
        repaired.push(new_level);
    }

    repaired
}

/// Rewrite heading levels so the document outline has no gaps.
pub fn repair_headings<D: DocumentModel + ?Sized>(doc: &mut D, log: &mut RunLog) -> Result<()> {
    let headings = headings_in_order(doc.tree());
    let declared: Vec<u8> = headings.iter().map(|(_, level)| level.get()).collect();
    if is_valid_hierarchy(&declared) {
        log::debug!("Heading hierarchy of {} heading(s) is valid", declared.len());
        return Ok(());
    }

    let repaired = repair_levels(&declared);
    for ((id, old), new) in headings.iter().zip(repaired) {
        if old.get() == new {
            continue;
        }
        // Repaired levels never exceed declared ones, so they stay within 1..=6
        let Some(level) = HeadingLevel::new(new) else {
            continue;
        };
        doc.tree_mut().retype(*id, StructRole::Heading(level))?;
        log.stats.headings_repaired += 1;
        log::debug!("Heading {} repaired from H{} to H{}", id, old.get(), new);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TaggedDocument;
    use crate::structure::StructureNode;

    #[test]
    fn test_repair_examples() {
        assert_eq!(repair_levels(&[2, 4, 4, 6]), vec![1, 2, 2, 3]);
        assert_eq!(repair_levels(&[1, 2, 3]), vec![1, 2, 3]);
        assert_eq!(repair_levels(&[3, 1, 5]), vec![1, 1, 2]);
        assert_eq!(repair_levels(&[1, 3, 2, 4]), vec![1, 2, 2, 3]);
        assert_eq!(repair_levels(&[]), Vec::<u8>::new());
    }

    #[test]
    fn test_valid_hierarchy() {
        assert!(is_valid_hierarchy(&[]));
        assert!(is_valid_hierarchy(&[1, 2, 2, 3, 1, 2]));
        assert!(!is_valid_hierarchy(&[2]));
        assert!(!is_valid_hierarchy(&[1, 3]));
    }

    #[test]
    fn test_repair_in_tree() {
        let mut doc = TaggedDocument::new();
        let root = doc.tree.root();
        let ids: Vec<_> = [2u8, 4, 4, 6]
            .iter()
            .map(|l| {
                doc.tree
                    .append_child(
                        root,
                        StructureNode::new(StructRole::Heading(HeadingLevel::new(*l).unwrap()))
                            .with_title(format!("Section H{}", l)),
                    )
                    .unwrap()
            })
            .collect();

        let mut log = RunLog::new();
        repair_headings(&mut doc, &mut log).unwrap();
        assert_eq!(log.stats.headings_repaired, 4);

        let levels: Vec<u8> = ids
            .iter()
            .map(|id| doc.tree.node(*id).unwrap().role.heading_level().unwrap().get())
            .collect();
        assert_eq!(levels, vec![1, 2, 2, 3]);
        // Titles survive
        assert_eq!(doc.tree.node(ids[1]).unwrap().title.as_deref(), Some("Section H4"));

        let mut log = RunLog::new();
        repair_headings(&mut doc, &mut log).unwrap();
        assert_eq!(log.stats.headings_repaired, 0);
    }
}
