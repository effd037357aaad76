//! Types for logical structure (tag) trees.
//!
//! Roles follow the standard structure types of ISO 32000-1:2008 Section 14.8.4,
//! narrowed to the set the remediation passes reason about. Anything else is
//! carried verbatim in [`StructRole::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a node in a [`StructureTree`](super::StructureTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Build an id from a raw arena index.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Heading level, always within 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Top-level heading (H1).
    pub const TOP: HeadingLevel = HeadingLevel(1);
    /// Deepest heading level (H6).
    pub const DEEPEST: HeadingLevel = HeadingLevel(6);

    /// Create a heading level, rejecting values outside 1..=6.
    pub fn new(level: u8) -> Option<Self> {
        if (1..=6).contains(&level) {
            Some(Self(level))
        } else {
            None
        }
    }

    /// Numeric level.
    pub fn get(self) -> u8 {
        self.0
    }

    /// The level one deeper than this one, saturating at H6.
    pub fn deeper(self) -> Self {
        Self((self.0 + 1).min(6))
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("heading level {} outside 1..=6", value))
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

/// Structure role of a node.
///
/// Closed over the roles the engine matches on; custom roles survive as
/// [`StructRole::Other`] so a round trip never loses information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StructRole {
    /// Illustration (`/Figure`)
    Figure,
    /// Table (`/Table`)
    Table,
    /// Table row (`/TR`)
    TableRow,
    /// Table header cell (`/TH`)
    TableHeaderCell,
    /// Table data cell (`/TD`)
    TableDataCell,
    /// Heading with explicit level (`/H1`..`/H6`)
    Heading(HeadingLevel),
    /// Paragraph (`/P`)
    Paragraph,
    /// List (`/L`)
    List,
    /// List item (`/LI`)
    ListItem,
    /// Link (`/Link`)
    Link,
    /// Form widget (`/Form`)
    Form,
    /// Annotation (`/Annot`)
    Annotation,
    /// Non-content artifact
    Artifact,
    /// Any other structure type, kept verbatim
    Other(String),
}

impl StructRole {
    /// Parse a structure type name. A leading `/` is ignored.
    pub fn from_name(name: &str) -> Self {
        let name = name.strip_prefix('/').unwrap_or(name);
        match name {
            "Figure" => Self::Figure,
            "Table" => Self::Table,
            "TR" => Self::TableRow,
            "TH" => Self::TableHeaderCell,
            "TD" => Self::TableDataCell,
            "P" => Self::Paragraph,
            "L" => Self::List,
            "LI" => Self::ListItem,
            "Link" => Self::Link,
            "Form" => Self::Form,
            "Annot" => Self::Annotation,
            "Artifact" => Self::Artifact,
            _ => {
                let level = name
                    .strip_prefix('H')
                    .and_then(|digits| digits.parse::<u8>().ok())
                    .and_then(HeadingLevel::new);
                match level {
                    Some(level) => Self::Heading(level),
                    None => Self::Other(name.to_string()),
                }
            },
        }
    }

    /// Structure type name as written in a structure tree.
    pub fn name(&self) -> String {
        match self {
            Self::Figure => "Figure".to_string(),
            Self::Table => "Table".to_string(),
            Self::TableRow => "TR".to_string(),
            Self::TableHeaderCell => "TH".to_string(),
            Self::TableDataCell => "TD".to_string(),
            Self::Heading(level) => format!("H{}", level.get()),
            Self::Paragraph => "P".to_string(),
            Self::List => "L".to_string(),
            Self::ListItem => "LI".to_string(),
            Self::Link => "Link".to_string(),
            Self::Form => "Form".to_string(),
            Self::Annotation => "Annot".to_string(),
            Self::Artifact => "Artifact".to_string(),
            Self::Other(name) => name.clone(),
        }
    }

    /// Check if this is a heading
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Heading(_))
    }

    /// Heading level, if this is a heading.
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        match self {
            Self::Heading(level) => Some(*level),
            _ => None,
        }
    }

    /// Rows and cells. These only make sense inside a table.
    pub fn is_table_part(&self) -> bool {
        matches!(self, Self::TableRow | Self::TableHeaderCell | Self::TableDataCell)
    }

    /// `THead`, `TBody` and `TFoot` row groups.
    pub fn is_table_section(&self) -> bool {
        matches!(self, Self::Other(name) if matches!(name.as_str(), "THead" | "TBody" | "TFoot"))
    }

    /// Check if this node marks non-content.
    pub fn is_artifact(&self) -> bool {
        matches!(self, Self::Artifact)
    }

    /// Whether a node of role `child` may sit directly under a node of this role.
    ///
    /// Only the containment rules the correction passes depend on are enforced:
    /// rows belong to tables (or their row groups), cells to rows, list items to lists.
    pub fn allows_child(&self, child: &StructRole) -> bool {
        match child {
            Self::TableRow => matches!(self, Self::Table) || self.is_table_section(),
            Self::TableHeaderCell | Self::TableDataCell => matches!(self, Self::TableRow),
            Self::ListItem => matches!(self, Self::List),
            _ => true,
        }
    }
}

impl fmt::Display for StructRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

impl From<String> for StructRole {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<StructRole> for String {
    fn from(role: StructRole) -> Self {
        role.name()
    }
}

/// Reference from a structure node to marked content on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentRef {
    /// Page index (0-based)
    pub page: usize,
    /// Marked content identifier
    pub mcid: u32,
}

impl ContentRef {
    /// Create a new content reference.
    pub fn new(page: usize, mcid: u32) -> Self {
        Self { page, mcid }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} MCID {}", self.page + 1, self.mcid)
    }
}

/// A node of the logical structure tree.
///
/// Tree links (`parent`, `children`) are owned by the arena and only change
/// through [`StructureTree`](super::StructureTree) operations.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureNode {
    /// Structure role
    pub role: StructRole,
    /// Title (`/T`)
    pub title: Option<String>,
    /// Alternate description (`/Alt`)
    pub alternate_text: Option<String>,
    /// Replacement text (`/ActualText`)
    pub actual_text: Option<String>,
    /// Table summary attribute
    pub summary: Option<String>,
    /// Page hint (`/Pg`)
    pub page: Option<usize>,
    /// Marked content owned by this node, in insertion order without duplicates
    pub(crate) associated_content: Vec<ContentRef>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl StructureNode {
    /// Create a detached node with the given role
    pub fn new(role: StructRole) -> Self {
        Self {
            role,
            title: None,
            alternate_text: None,
            actual_text: None,
            summary: None,
            page: None,
            associated_content: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the alternate text.
    pub fn with_alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alternate_text = Some(alt.into());
        self
    }

    /// Set the actual text.
    pub fn with_actual_text(mut self, text: impl Into<String>) -> Self {
        self.actual_text = Some(text.into());
        self
    }

    /// Set the page hint.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Associate marked content with this node.
    pub fn with_content(mut self, content: ContentRef) -> Self {
        self.add_content(content);
        self
    }

    /// Associate marked content; duplicates are ignored.
    pub fn add_content(&mut self, content: ContentRef) {
        if !self.associated_content.contains(&content) {
            self.associated_content.push(content);
        }
    }

    /// Marked content owned by this node.
    pub fn associated_content(&self) -> &[ContentRef] {
        &self.associated_content
    }

    /// Ordered children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent node, `None` for the root or a detached node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}
