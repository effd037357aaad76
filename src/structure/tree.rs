//! Arena-backed structure tree.
//!
//! Nodes live in a single vector and refer to each other by [`NodeId`]. Removed
//! nodes leave a tombstone so ids handed out earlier never alias a new node.

use super::types::{NodeId, StructRole, StructureNode};
use crate::error::{Error, Result};

/// Structure tree with O(1) navigation towards both parents and children.
#[derive(Debug, Clone)]
pub struct StructureTree {
    nodes: Vec<Option<StructureNode>>,
    root: NodeId,
}

impl StructureTree {
    /// Create a tree whose root is a `/Document` element.
    pub fn new() -> Self {
        Self::with_root(StructureNode::new(StructRole::Other("Document".to_string())))
    }

    /// Create a tree with the given root node.
    pub fn with_root(mut root: StructureNode) -> Self {
        root.parent = None;
        root.children.clear();
        Self {
            nodes: vec![Some(root)],
            root: NodeId::from_index(0),
        }
    }

    /// Root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// A tree always has its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Borrow a node if the id is live.
    pub fn get(&self, id: NodeId) -> Option<&StructureNode> {
        self.nodes.get(id.index()).and_then(|n| n.as_ref())
    }

    /// Borrow a node, failing on stale ids.
    pub fn node(&self, id: NodeId) -> Result<&StructureNode> {
        self.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Mutably borrow a node, failing on stale ids.
    ///
    /// Tree links are not reachable through the returned reference.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut StructureNode> {
        self.nodes
            .get_mut(id.index())
            .and_then(|n| n.as_mut())
            .ok_or(Error::NodeNotFound(id))
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node in reading order (empty for stale ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Position of a node among its parent's children.
    pub fn position_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Append a new node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, node: StructureNode) -> Result<NodeId> {
        let index = self.node(parent)?.children.len();
        self.insert_child(parent, index, node)
    }

    /// Insert a new node at `index` among `parent`'s children.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        mut node: StructureNode,
    ) -> Result<NodeId> {
        let child_count = self.node(parent)?.children.len();
        if index > child_count {
            return Err(Error::InvalidStructure(format!(
                "insert position {} beyond {} children of node {}",
                index, child_count, parent
            )));
        }

        let id = NodeId::from_index(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(Some(node));
        self.node_mut(parent)?.children.insert(index, id);
        Ok(id)
    }

    /// Change a node's role, returning the previous one.
    ///
    /// Only the role changes; title, texts, content and links are preserved.
    pub fn retype(&mut self, id: NodeId, role: StructRole) -> Result<StructRole> {
        let node = self.node_mut(id)?;
        Ok(std::mem::replace(&mut node.role, role))
    }

    /// Detach a node (with its subtree) from its parent.
    ///
    /// The node stays in the arena and must be re-attached with [`attach`](Self::attach)
    /// or dropped with [`remove_subtree`](Self::remove_subtree).
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::InvalidStructure("cannot detach the root".to_string()));
        }
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|c| *c != id);
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Attach a detached node at `index` among `parent`'s children.
    pub fn attach(&mut self, parent: NodeId, index: usize, id: NodeId) -> Result<()> {
        if self.node(id)?.parent.is_some() || id == self.root {
            return Err(Error::InvalidStructure(format!("node {} is already attached", id)));
        }
        if parent == id || self.ancestors(parent).any(|a| a == id) {
            return Err(Error::InvalidStructure(format!(
                "attaching node {} under {} would create a cycle",
                id, parent
            )));
        }
        let child_count = self.node(parent)?.children.len();
        if index > child_count {
            return Err(Error::InvalidStructure(format!(
                "attach position {} beyond {} children of node {}",
                index, child_count, parent
            )));
        }
        self.node_mut(parent)?.children.insert(index, id);
        self.node_mut(id)?.parent = Some(parent);
        Ok(())
    }

    /// Detach and drop a node and all of its descendants.
    ///
    /// Returns the number of nodes removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<usize> {
        self.detach(id)?;
        let doomed: Vec<NodeId> = self.preorder_from(id).collect();
        for node in &doomed {
            self.nodes[node.index()] = None;
        }
        Ok(doomed.len())
    }

    /// Ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Depth-first pre-order walk of the attached tree, root first.
    ///
    /// This is document (reading) order.
    pub fn preorder(&self) -> Preorder<'_> {
        self.preorder_from(self.root)
    }

    /// Pre-order walk of the subtree rooted at `start`, including `start`.
    pub fn preorder_from(&self, start: NodeId) -> Preorder<'_> {
        let stack = if self.get(start).is_some() {
            vec![start]
        } else {
            Vec::new()
        };
        Preorder { tree: self, stack }
    }

    /// Descendants of a node in pre-order, excluding the node itself.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.preorder_from(id).skip(1)
    }
}

impl Default for StructureTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors, see [`StructureTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a StructureTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Iterator for pre-order traversal, see [`StructureTree::preorder`].
pub struct Preorder<'a> {
    tree: &'a StructureTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Push in reverse so the first child is visited next
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
