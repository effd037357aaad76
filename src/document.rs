//! Document model consumed by the remediation engine.
//!
//! The engine never reads or writes the container format itself. It works
//! through [`DocumentModel`], which exposes the structure tree, per-page content
//! objects with their geometry, raw content stream bytes and the reading-order
//! flags of each page. [`TaggedDocument`] is the in-memory implementation used by
//! snapshots and tests.

use crate::error::{Error, Result};
use crate::structure::{ContentRef, NodeId, StructureTree};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a content-bearing object on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// Image XObject or inline image
    Image,
    /// Form XObject
    FormXObject,
    /// Annotation (links, comments, ...)
    Annotation,
    /// Interactive form field widget
    FormField,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Image => "image",
            ContentKind::FormXObject => "form XObject",
            ContentKind::Annotation => "annotation",
            ContentKind::FormField => "form field",
        };
        write!(f, "{}", name)
    }
}

/// Width and height in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in device pixels
    pub width: u32,
    /// Height in device pixels
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, `None` when the height is zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }

    /// Area in square device pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether either side exceeds `limit`.
    pub fn exceeds(&self, limit: u32) -> bool {
        self.width > limit || self.height > limit
    }
}

/// A visual or interactive unit on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentObject {
    /// Object kind
    pub kind: ContentKind,
    /// Geometry, when the object has any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    /// Page index (0-based)
    pub page_index: usize,
    /// Marked content identifier linking the object to the structure tree
    pub mcid: u32,
    /// Link target, for annotations that carry a URI action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Accessible name of a form field (`/TU`, else `/T`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ContentObject {
    /// Create a content object without geometry.
    pub fn new(kind: ContentKind, page_index: usize, mcid: u32) -> Self {
        Self {
            kind,
            dimensions: None,
            page_index,
            mcid,
            uri: None,
            label: None,
        }
    }

    /// Create an image with the given size.
    pub fn image(page_index: usize, mcid: u32, width: u32, height: u32) -> Self {
        Self::new(ContentKind::Image, page_index, mcid).with_dimensions(width, height)
    }

    /// Set the geometry.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some(Dimensions::new(width, height));
        self
    }

    /// Set the link target.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the form field label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Reference used by structure nodes to point at this object.
    pub fn content_ref(&self) -> ContentRef {
        ContentRef::new(self.page_index, self.mcid)
    }
}

/// Annotation tab order of a page (`/Tabs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TabOrder {
    /// No `/Tabs` entry: viewer default (device order)
    #[default]
    Unspecified,
    /// Row order (`/R`)
    Row,
    /// Column order (`/C`)
    Column,
    /// Structure order (`/S`)
    Structure,
}

/// One page of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Raw (decoded) content stream bytes
    #[serde(default)]
    pub content_bytes: Vec<u8>,
    /// Content objects in paint order
    #[serde(default)]
    pub content_objects: Vec<ContentObject>,
    /// `/StructParents` key linking the page to the parent tree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struct_parents: Option<u32>,
    /// `/Tabs` entry
    #[serde(default)]
    pub tab_order: TabOrder,
}

impl PageRecord {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content stream bytes.
    pub fn with_content_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.content_bytes = bytes.into();
        self
    }

    /// Add a content object.
    pub fn with_object(mut self, object: ContentObject) -> Self {
        self.content_objects.push(object);
        self
    }

    /// Whether the page links into the parent tree and tabs follow structure.
    pub fn reading_order_configured(&self) -> bool {
        self.struct_parents.is_some() && self.tab_order == TabOrder::Structure
    }
}

/// Access to a parsed document, provided by the container layer.
///
/// Implementations own the structure tree and pages for the duration of a run;
/// the engine mutates them in place.
pub trait DocumentModel {
    /// The structure tree.
    fn tree(&self) -> &StructureTree;

    /// The structure tree, mutably.
    fn tree_mut(&mut self) -> &mut StructureTree;

    /// All pages in order.
    fn pages(&self) -> &[PageRecord];

    /// A single page, mutably.
    fn page_mut(&mut self, index: usize) -> Result<&mut PageRecord>;

    /// Number of pages.
    fn page_count(&self) -> usize {
        self.pages().len()
    }

    /// Look up the content object a structure node points at.
    fn content_object(&self, content: &ContentRef) -> Option<&ContentObject> {
        self.pages()
            .get(content.page)?
            .content_objects
            .iter()
            .find(|o| o.mcid == content.mcid)
    }

    /// Container new nodes for `page` are attached under.
    ///
    /// Defaults to the structure tree root.
    fn page_container(&self, _page: usize) -> NodeId {
        self.tree().root()
    }
}

/// In-memory document: a structure tree plus its pages.
#[derive(Debug, Clone, Default)]
pub struct TaggedDocument {
    /// Logical structure
    pub tree: StructureTree,
    /// Pages in order
    pub pages: Vec<PageRecord>,
}

impl TaggedDocument {
    /// Create a document with an empty `/Document` root and no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from an existing tree and pages.
    pub fn from_parts(tree: StructureTree, pages: Vec<PageRecord>) -> Self {
        Self { tree, pages }
    }

    /// Append a page and return its index.
    pub fn add_page(&mut self, page: PageRecord) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Every content object on every page.
    pub fn content_objects(&self) -> impl Iterator<Item = &ContentObject> {
        self.pages.iter().flat_map(|p| p.content_objects.iter())
    }
}

impl DocumentModel for TaggedDocument {
    fn tree(&self) -> &StructureTree {
        &self.tree
    }

    fn tree_mut(&mut self) -> &mut StructureTree {
        &mut self.tree
    }

    fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    fn page_mut(&mut self, index: usize) -> Result<&mut PageRecord> {
        self.pages.get_mut(index).ok_or(Error::PageOutOfRange(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let dims = Dimensions::new(800, 200);
        assert_eq!(dims.aspect_ratio(), Some(4.0));
        assert_eq!(dims.area(), 160_000);
        assert!(!dims.exceeds(1500));
        assert!(Dimensions::new(1501, 10).exceeds(1500));
        assert_eq!(Dimensions::new(10, 0).aspect_ratio(), None);
    }

    #[test]
    fn test_reading_order_configured() {
        let mut page = PageRecord::new();
        assert!(!page.reading_order_configured());
        page.struct_parents = Some(0);
        assert!(!page.reading_order_configured());
        page.tab_order = TabOrder::Structure;
        assert!(page.reading_order_configured());
    }

    #[test]
    fn test_content_object_lookup() {
        let mut doc = TaggedDocument::new();
        doc.add_page(PageRecord::new().with_object(ContentObject::image(0, 4, 100, 100)));
        doc.add_page(
            PageRecord::new().with_object(ContentObject::new(ContentKind::FormField, 1, 0)),
        );

        let image = doc.content_object(&ContentRef::new(0, 4)).unwrap();
        assert_eq!(image.kind, ContentKind::Image);
        assert!(doc.content_object(&ContentRef::new(0, 5)).is_none());
        assert!(doc.content_object(&ContentRef::new(9, 0)).is_none());
        assert_eq!(doc.content_objects().count(), 2);
    }

    #[test]
    fn test_page_mut_out_of_range() {
        let mut doc = TaggedDocument::new();
        assert!(matches!(doc.page_mut(0), Err(Error::PageOutOfRange(0))));
        doc.add_page(PageRecord::new());
        assert!(doc.page_mut(0).is_ok());
        assert_eq!(doc.page_container(0), doc.tree.root());
    }
}
