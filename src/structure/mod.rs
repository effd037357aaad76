//! Logical structure (tag) tree.
//!
//! This module models the structure hierarchy of a Tagged PDF according to
//! ISO 32000-1:2008 Section 14.7 as an arena of nodes.
//!
//! ## Overview
//!
//! - **StructureTree**: owns every node; parent and child links are [`NodeId`]s
//! - **StructureNode**: role, title, alternate/actual text and the marked
//!   content it owns
//! - **ContentRef**: page plus marked content identifier (MCID)
//!
//! Reading order is pre-order traversal of the tree, so every pass that needs
//! "document order" walks [`StructureTree::preorder`].
//!
//! ## Example
//!
//! ```
//! use pdf_remediate::structure::{ContentRef, StructRole, StructureNode, StructureTree};
//!
//! let mut tree = StructureTree::new();
//! let figure = tree
//!     .append_child(
//!         tree.root(),
//!         StructureNode::new(StructRole::Figure)
//!             .with_title("Image on page 1")
//!             .with_content(ContentRef::new(0, 0)),
//!     )
//!     .unwrap();
//! assert_eq!(tree.parent(figure), Some(tree.root()));
//! ```

pub mod traversal;
mod tree;
mod types;

pub use traversal::{ContentIndex, headings_in_order};
pub use tree::{Ancestors, Preorder, StructureTree};
pub use types::{ContentRef, HeadingLevel, NodeId, StructRole, StructureNode};
