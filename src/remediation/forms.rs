//! Form field label audit.
//!
//! A field needs an accessible name: either its own label (`/TU` or `/T`) or
//! descriptive text on the `/Form` node that tags it. Names are never invented;
//! unnamed fields are left for review.

use super::stats::{ReviewCode, ReviewItem, RunLog};
use crate::document::{ContentKind, ContentObject, DocumentModel};
use crate::error::Result;
use crate::structure::{ContentIndex, StructRole, StructureTree};

fn has_text(text: Option<&str>) -> bool {
    text.is_some_and(|t| !t.trim().is_empty())
}

/// Whether a form field has an accessible name.
pub fn is_labeled(field: &ContentObject, tree: &StructureTree, index: &ContentIndex) -> bool {
    if has_text(field.label.as_deref()) {
        return true;
    }
    index.owners(&field.content_ref()).iter().any(|id| {
        tree.get(*id).is_some_and(|n| {
            n.role == StructRole::Form
                && (has_text(n.alternate_text.as_deref()) || has_text(n.actual_text.as_deref()))
        })
    })
}

/// Report form fields without an accessible name.
pub fn audit_form_fields<D: DocumentModel + ?Sized>(doc: &D, log: &mut RunLog) -> Result<()> {
    let index = ContentIndex::build(doc.tree());
    let unlabeled: Vec<&ContentObject> = doc
        .pages()
        .iter()
        .flat_map(|p| p.content_objects.iter())
        .filter(|o| o.kind == ContentKind::FormField)
        .filter(|o| !is_labeled(o, doc.tree(), &index))
        .collect();

    for field in unlabeled {
        log.stats.form_fields_unlabeled += 1;
        log.unresolved(
            ReviewItem::new(ReviewCode::FormFieldUnlabeled, "Form field has no accessible name")
                .with_location(format!("page {}, MCID {}", field.page_index + 1, field.mcid)),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{PageRecord, TaggedDocument};
    use crate::structure::{ContentRef, StructureNode};

    #[test]
    fn test_unlabeled_fields_are_reported() {
        let mut doc = TaggedDocument::new();
        doc.add_page(
            PageRecord::new()
                .with_object(ContentObject::new(ContentKind::FormField, 0, 0).with_label("Email address"))
                .with_object(ContentObject::new(ContentKind::FormField, 0, 1))
                .with_object(ContentObject::new(ContentKind::FormField, 0, 2))
                .with_object(ContentObject::new(ContentKind::FormField, 0, 3).with_label("  "))
                .with_object(ContentObject::image(0, 4, 640, 480)),
        );
        let root = doc.tree.root();
        doc.tree
            .append_child(
                root,
                StructureNode::new(StructRole::Form)
                    .with_alt_text("Date of birth")
                    .with_content(ContentRef::new(0, 1)),
            )
            .unwrap();
        // Text on a non-form node does not name the field
        doc.tree
            .append_child(
                root,
                StructureNode::new(StructRole::Paragraph)
                    .with_alt_text("Phone number")
                    .with_content(ContentRef::new(0, 2)),
            )
            .unwrap();

        let mut log = RunLog::new();
        audit_form_fields(&doc, &mut log).unwrap();
        assert_eq!(log.stats.form_fields_unlabeled, 2);
        assert_eq!(log.stats.unresolved, 2);
        assert!(log.review_items.iter().all(|i| i.code == ReviewCode::FormFieldUnlabeled));
        assert_eq!(log.review_items[0].location.as_deref(), Some("page 1, MCID 2"));
        assert_eq!(doc.tree.len(), 3);
    }
}
