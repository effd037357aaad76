//! JSON snapshots of a [`TaggedDocument`].
//!
//! The container layer can dump its parsed structure tree and page records in
//! this form, run the engine through [`TaggedDocument`], and read the result
//! back. The tree is stored nested; ids are reassigned on load.

use crate::document::{PageRecord, TaggedDocument};
use crate::error::{Error, Result};
use crate::structure::{ContentRef, NodeId, StructRole, StructureNode, StructureTree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Nested form of a structure node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Structure role
    pub role: StructRole,
    /// Title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Alternate text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_text: Option<String>,
    /// Actual text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_text: Option<String>,
    /// Table summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Page hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    /// Referenced marked content
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentRef>,
    /// Children in reading order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// Serialized document: structure tree root plus pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Root of the structure tree
    pub structure: NodeSnapshot,
    /// Pages in order
    #[serde(default)]
    pub pages: Vec<PageRecord>,
}

impl NodeSnapshot {
    fn from_tree(tree: &StructureTree, id: NodeId) -> Result<Self> {
        let node = tree.node(id)?;
        let children = node
            .children()
            .iter()
            .map(|child| Self::from_tree(tree, *child))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            role: node.role.clone(),
            title: node.title.clone(),
            alternate_text: node.alternate_text.clone(),
            actual_text: node.actual_text.clone(),
            summary: node.summary.clone(),
            page: node.page,
            content: node.associated_content().to_vec(),
            children,
        })
    }

    fn to_node(&self) -> StructureNode {
        let mut node = StructureNode::new(self.role.clone());
        node.title = self.title.clone();
        node.alternate_text = self.alternate_text.clone();
        node.actual_text = self.actual_text.clone();
        node.summary = self.summary.clone();
        node.page = self.page;
        for content in &self.content {
            node.add_content(*content);
        }
        node
    }

    fn append_children(&self, tree: &mut StructureTree, parent: NodeId) -> Result<()> {
        for child in &self.children {
            let id = tree.append_child(parent, child.to_node())?;
            child.append_children(tree, id)?;
        }
        Ok(())
    }
}

impl DocumentSnapshot {
    /// Capture a document.
    pub fn capture(document: &TaggedDocument) -> Result<Self> {
        Ok(Self {
            structure: NodeSnapshot::from_tree(&document.tree, document.tree.root())?,
            pages: document.pages.clone(),
        })
    }

    /// Rebuild the document, checking page references and marked-content ids.
    pub fn into_document(self) -> Result<TaggedDocument> {
        for (index, page) in self.pages.iter().enumerate() {
            let mut mcids = HashSet::new();
            for object in &page.content_objects {
                if object.page_index != index {
                    return Err(Error::InvalidStructure(format!(
                        "content object MCID {} listed on page {} claims page {}",
                        object.mcid,
                        index + 1,
                        object.page_index + 1
                    )));
                }
                if !mcids.insert(object.mcid) {
                    return Err(Error::InvalidStructure(format!(
                        "MCID {} is used by more than one content object on page {}",
                        object.mcid,
                        index + 1
                    )));
                }
            }
        }

        let mut tree = StructureTree::with_root(self.structure.to_node());
        let root = tree.root();
        self.structure.append_children(&mut tree, root)?;

        let page_count = self.pages.len();
        for id in tree.preorder() {
            let node = tree.node(id)?;
            if let Some(content) = node.associated_content().iter().find(|c| c.page >= page_count) {
                return Err(Error::InvalidStructure(format!(
                    "node {} references {} but the document has {} pages",
                    node.role, content, page_count
                )));
            }
        }

        Ok(TaggedDocument::from_parts(tree, self.pages))
    }
}

impl TaggedDocument {
    /// Parse a snapshot from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: DocumentSnapshot = serde_json::from_str(json)?;
        snapshot.into_document()
    }

    /// Read a snapshot from any reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let snapshot: DocumentSnapshot = serde_json::from_reader(reader)?;
        snapshot.into_document()
    }

    /// Load a snapshot file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        log::debug!("Loading document snapshot from {}", path.as_ref().display());
        Self::from_json_reader(BufReader::new(file))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&DocumentSnapshot::capture(self)?)?)
    }

    /// Write the snapshot to any writer.
    pub fn to_json_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &DocumentSnapshot::capture(self)?)?;
        Ok(())
    }

    /// Save the snapshot to a file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.to_json_writer(&mut writer)?;
        writer.flush()?;
        log::debug!("Saved document snapshot to {}", path.as_ref().display());
        Ok(())
    }
}
