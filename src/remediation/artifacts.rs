//! Artifact completeness.
//!
//! Every content object must be claimed by the structure tree, either as real
//! content or as an explicit artifact. Untagged objects get an `/Artifact` node;
//! existing nodes are never touched.

use super::stats::{ReviewCode, ReviewItem, RunLog};
use crate::document::{ContentObject, DocumentModel};
use crate::error::Result;
use crate::structure::{ContentIndex, ContentRef, StructRole, StructureNode};
use std::collections::HashSet;

/// Mark every unreferenced content object as an artifact.
///
/// Objects sharing a `(page, mcid)` reference are handled once.
pub fn enforce_artifacts<D: DocumentModel + ?Sized>(doc: &mut D, log: &mut RunLog) -> Result<()> {
    let index = ContentIndex::build(doc.tree());
    let mut untagged: Vec<ContentObject> = Vec::new();
    let mut seen: HashSet<ContentRef> = HashSet::new();

    for object in doc.pages().iter().flat_map(|p| p.content_objects.iter()) {
        let content = object.content_ref();
        if !seen.insert(content) {
            continue;
        }
        match index.owners(&content).len() {
            0 => untagged.push(object.clone()),
            1 => {},
            owners => log.unresolved(
                ReviewItem::new(
                    ReviewCode::DuplicateContentReference,
                    format!("{} {} is referenced by {} structure nodes", object.kind, content, owners),
                )
                .with_location(format!("page {}", object.page_index + 1)),
            ),
        }
    }

    for object in untagged {
        let container = doc.page_container(object.page_index);
        let node = StructureNode::new(StructRole::Artifact)
            .with_alt_text("")
            .with_page(object.page_index)
            .with_content(object.content_ref());
        doc.tree_mut().append_child(container, node)?;
        log.stats.artifacts_marked += 1;
        log::debug!("Marked untagged {} {} as artifact", object.kind, object.content_ref());
    }

    Ok(())
}
