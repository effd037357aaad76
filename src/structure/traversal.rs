//! Structure tree queries used by the remediation passes.
//!
//! Everything here walks the tree in pre-order, which is document order.

use super::tree::StructureTree;
use super::types::{ContentRef, HeadingLevel, NodeId, StructRole};
use std::collections::HashMap;

/// Reverse index from marked content to the attached nodes that reference it.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    owners: HashMap<ContentRef, Vec<NodeId>>,
}

impl ContentIndex {
    /// Build the index from the attached part of the tree.
    pub fn build(tree: &StructureTree) -> Self {
        let mut owners: HashMap<ContentRef, Vec<NodeId>> = HashMap::new();
        for id in tree.preorder() {
            if let Some(node) = tree.get(id) {
                for content in node.associated_content() {
                    owners.entry(*content).or_default().push(id);
                }
            }
        }
        Self { owners }
    }

    /// Nodes referencing the content, in document order.
    pub fn owners(&self, content: &ContentRef) -> &[NodeId] {
        self.owners.get(content).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Whether any node references the content.
    pub fn is_referenced(&self, content: &ContentRef) -> bool {
        !self.owners(content).is_empty()
    }

    /// Every referenced content item.
    pub fn referenced(&self) -> impl Iterator<Item = &ContentRef> {
        self.owners.keys()
    }
}

/// All headings in document order with their declared levels.
pub fn headings_in_order(tree: &StructureTree) -> Vec<(NodeId, HeadingLevel)> {
    tree.preorder()
        .filter_map(|id| {
            tree.get(id)
                .and_then(|n| n.role.heading_level())
                .map(|level| (id, level))
        })
        .collect()
}

/// Marked content referenced anywhere in the subtree rooted at `id`.
pub fn subtree_content(tree: &StructureTree, id: NodeId) -> Vec<ContentRef> {
    tree.preorder_from(id)
        .filter_map(|n| tree.get(n))
        .flat_map(|n| n.associated_content().iter().copied())
        .collect()
}

/// Whether some strict descendant of `id` has a role matching `predicate`.
pub fn has_descendant_role<F>(tree: &StructureTree, id: NodeId, predicate: F) -> bool
where
    F: Fn(&StructRole) -> bool,
{
    tree.descendants(id)
        .filter_map(|n| tree.get(n))
        .any(|n| predicate(&n.role))
}

/// Nodes with the given role, in document order.
pub fn nodes_with_role(tree: &StructureTree, role: &StructRole) -> Vec<NodeId> {
    tree.preorder()
        .filter(|id| tree.get(*id).is_some_and(|n| &n.role == role))
        .collect()
}

/// Page a node belongs to: its own page hint, else the page of the first
/// content referenced in its subtree.
pub fn node_page(tree: &StructureTree, id: NodeId) -> Option<usize> {
    tree.get(id)
        .and_then(|n| n.page)
        .or_else(|| subtree_content(tree, id).first().map(|c| c.page))
}
