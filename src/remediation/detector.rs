//! Existing-tag detection.
//!
//! Decides, per content category, whether the document already carries
//! adequate tagging. Detection is read-only and cheap enough to be re-run after
//! every pass that could change its answer.

use crate::config::AltTextPolicy;
use crate::document::PageRecord;
use crate::structure::traversal::{has_descendant_role, node_page, nodes_with_role};
use crate::structure::{headings_in_order, ContentIndex, ContentRef, NodeId, StructRole, StructureTree};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Alternate text that is just an image file name
    static ref IMAGE_FILE_NAME: Regex =
        Regex::new(r"(?i)^[\w\-. ]+\.(png|jpe?g|gif|bmp|tiff?|svg|webp)$").unwrap();
}

/// Quality of existing tagging for one content category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagQuality {
    /// Tagging exists and is adequate
    Good,
    /// Tagging exists but is inadequate
    Poor,
    /// No tagging
    Absent,
}

/// Result of a detection query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAssessment {
    /// Quality of the existing tagging
    pub quality: TagQuality,
    /// Descriptive text already present, if any
    pub existing_text: Option<String>,
    /// Node carrying the existing tag, if any
    pub node: Option<NodeId>,
}

impl TagAssessment {
    fn new(quality: TagQuality) -> Self {
        Self {
            quality,
            existing_text: None,
            node: None,
        }
    }

    /// No tagging found.
    pub fn absent() -> Self {
        Self::new(TagQuality::Absent)
    }

    /// Whether existing tagging is adequate.
    pub fn is_adequate(&self) -> bool {
        self.quality == TagQuality::Good
    }
}

/// Existing-tag detector.
#[derive(Debug, Clone, Default)]
pub struct TagDetector {
    policy: AltTextPolicy,
}

impl TagDetector {
    /// Create a detector with the given alternate text policy.
    pub fn new(policy: AltTextPolicy) -> Self {
        Self { policy }
    }

    /// Whether alternate text actually describes something.
    ///
    /// Rejects empty and too-short text, generic phrases such as "image" or
    /// "photo", and bare file names.
    pub fn is_quality_alt_text(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.policy.min_length.max(1) {
            return false;
        }

        let normalized = trimmed
            .trim_end_matches(|c: char| c == '.' || c == ':' || c == '!')
            .trim()
            .to_lowercase();
        if self.policy.generic_phrases.iter().any(|p| p.to_lowercase() == normalized) {
            return false;
        }

        !IMAGE_FILE_NAME.is_match(trimmed)
    }

    /// Assess the tag of an image.
    ///
    /// Good iff a `/Figure` references the image and its alternate text passes
    /// [`is_quality_alt_text`](Self::is_quality_alt_text). A figure with weak
    /// text is Poor; no figure at all is Absent.
    pub fn assess_image(
        &self,
        tree: &StructureTree,
        index: &ContentIndex,
        content: &ContentRef,
    ) -> TagAssessment {
        let figures: Vec<NodeId> = index
            .owners(content)
            .iter()
            .copied()
            .filter(|id| tree.get(*id).is_some_and(|n| n.role == StructRole::Figure))
            .collect();

        let Some(first) = figures.first().copied() else {
            return TagAssessment::absent();
        };

        for id in &figures {
            if let Some(alt) = tree.get(*id).and_then(|n| n.alternate_text.as_deref()) {
                if self.is_quality_alt_text(alt) {
                    return TagAssessment {
                        quality: TagQuality::Good,
                        existing_text: Some(alt.to_string()),
                        node: Some(*id),
                    };
                }
            }
        }

        TagAssessment {
            quality: TagQuality::Poor,
            existing_text: tree.get(first).and_then(|n| n.alternate_text.clone()),
            node: Some(first),
        }
    }

    /// Assess a single `/Table` node: Good iff it has a header cell.
    pub fn assess_table_node(&self, tree: &StructureTree, table: NodeId) -> TagAssessment {
        let has_headers = has_descendant_role(tree, table, |r| *r == StructRole::TableHeaderCell);
        TagAssessment {
            quality: if has_headers {
                TagQuality::Good
            } else {
                TagQuality::Poor
            },
            existing_text: tree.get(table).and_then(|n| n.summary.clone()),
            node: Some(table),
        }
    }

    /// Assess table tagging on a page.
    ///
    /// Good iff some `/Table` on the page has at least one `/TH` descendant.
    pub fn assess_tables_on_page(&self, tree: &StructureTree, page: usize) -> TagAssessment {
        let tables: Vec<NodeId> = nodes_with_role(tree, &StructRole::Table)
            .into_iter()
            .filter(|id| node_page(tree, *id) == Some(page))
            .collect();

        let mut assessment = TagAssessment::absent();
        for table in tables {
            let candidate = self.assess_table_node(tree, table);
            if candidate.is_adequate() {
                return candidate;
            }
            if assessment.quality == TagQuality::Absent {
                assessment = candidate;
            }
        }
        assessment
    }

    /// Assess the heading hierarchy.
    ///
    /// Good iff headings in document order start at H1 and never skip a level
    /// going deeper. Absent when the document has no headings.
    pub fn assess_headings(&self, tree: &StructureTree) -> TagAssessment {
        let levels: Vec<u8> = headings_in_order(tree).iter().map(|(_, l)| l.get()).collect();
        if levels.is_empty() {
            return TagAssessment::absent();
        }

        let starts_at_top = levels[0] == 1;
        let no_skips = levels.windows(2).all(|w| w[1] <= w[0] + 1);
        TagAssessment::new(if starts_at_top && no_skips {
            TagQuality::Good
        } else {
            TagQuality::Poor
        })
    }

    /// Assess reading order: Good iff every page is configured to follow the
    /// structure tree.
    pub fn assess_reading_order(&self, pages: &[PageRecord]) -> TagAssessment {
        let configured = pages.iter().filter(|p| p.reading_order_configured()).count();
        let quality = if configured == pages.len() {
            TagQuality::Good
        } else if configured > 0 {
            TagQuality::Poor
        } else {
            TagQuality::Absent
        };
        TagAssessment::new(quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TabOrder;
    use crate::structure::{HeadingLevel, StructureNode};

    fn detector() -> TagDetector {
        TagDetector::new(AltTextPolicy::default())
    }

    fn tree_with_headings(levels: &[u8]) -> StructureTree {
        let mut tree = StructureTree::new();
        let root = tree.root();
        for level in levels {
            tree.append_child(
                root,
                StructureNode::new(StructRole::Heading(HeadingLevel::new(*level).unwrap())),
            )
            .unwrap();
        }
        tree
    }

    #[test]
    fn test_alt_text_quality() {
        let d = detector();
        assert!(d.is_quality_alt_text("Bar chart of quarterly revenue"));
        assert!(d.is_quality_alt_text("chart of revenue"));
        assert!(!d.is_quality_alt_text(""));
        assert!(!d.is_quality_alt_text("   "));
        assert!(!d.is_quality_alt_text("Logo"));
        assert!(!d.is_quality_alt_text("Image"));
        assert!(!d.is_quality_alt_text("PHOTO."));
        assert!(!d.is_quality_alt_text("picture"));
        assert!(!d.is_quality_alt_text("screenshot"));
        assert!(!d.is_quality_alt_text("IMG_2041.JPG"));
        assert!(!d.is_quality_alt_text("company-banner.png"));
        // Heuristic descriptions pass, so a second run leaves them alone
        assert!(d.is_quality_alt_text("Graphic element on page 1"));
    }

    #[test]
    fn test_image_assessment() {
        let d = detector();
        let mut tree = StructureTree::new();
        let root = tree.root();
        let good = ContentRef::new(0, 1);
        let poor = ContentRef::new(0, 2);
        let wrong_role = ContentRef::new(0, 3);
        tree.append_child(root, StructureNode::new(StructRole::Figure).with_alt_text("Map of the campus").with_content(good)).unwrap();
        tree.append_child(root, StructureNode::new(StructRole::Figure).with_alt_text("image").with_content(poor)).unwrap();
        tree.append_child(root, StructureNode::new(StructRole::Table).with_alt_text("chart of revenue").with_content(wrong_role)).unwrap();
        let index = ContentIndex::build(&tree);

        let a = d.assess_image(&tree, &index, &good);
        assert_eq!(a.quality, TagQuality::Good);
        assert_eq!(a.existing_text.as_deref(), Some("Map of the campus"));

        let a = d.assess_image(&tree, &index, &poor);
        assert_eq!(a.quality, TagQuality::Poor);
        assert_eq!(a.existing_text.as_deref(), Some("image"));

        // Only /Figure nodes count as image tags
        assert_eq!(d.assess_image(&tree, &index, &wrong_role).quality, TagQuality::Absent);
        assert_eq!(d.assess_image(&tree, &index, &ContentRef::new(1, 0)).quality, TagQuality::Absent);
    }

    #[test]
    fn test_table_assessment() {
        let d = detector();
        let mut tree = StructureTree::new();
        let root = tree.root();

        let with_headers = tree.append_child(root, StructureNode::new(StructRole::Table).with_page(0)).unwrap();
        let row = tree.append_child(with_headers, StructureNode::new(StructRole::TableRow)).unwrap();
        tree.append_child(row, StructureNode::new(StructRole::TableHeaderCell)).unwrap();

        let without = tree.append_child(root, StructureNode::new(StructRole::Table).with_page(1)).unwrap();
        let row = tree.append_child(without, StructureNode::new(StructRole::TableRow)).unwrap();
        tree.append_child(row, StructureNode::new(StructRole::TableDataCell)).unwrap();

        assert_eq!(d.assess_tables_on_page(&tree, 0).quality, TagQuality::Good);
        assert_eq!(d.assess_tables_on_page(&tree, 1).quality, TagQuality::Poor);
        assert_eq!(d.assess_tables_on_page(&tree, 2).quality, TagQuality::Absent);
    }

    #[test]
    fn test_heading_assessment() {
        let d = detector();
        assert_eq!(d.assess_headings(&tree_with_headings(&[1, 2, 3, 2, 1])).quality, TagQuality::Good);
        assert_eq!(d.assess_headings(&tree_with_headings(&[2, 3])).quality, TagQuality::Poor);
        assert_eq!(d.assess_headings(&tree_with_headings(&[1, 3])).quality, TagQuality::Poor);
        assert_eq!(d.assess_headings(&tree_with_headings(&[])).quality, TagQuality::Absent);
    }

    #[test]
    fn test_reading_order_assessment() {
        let d = detector();
        let configured = PageRecord {
            struct_parents: Some(0),
            tab_order: TabOrder::Structure,
            ..Default::default()
        };
        let unconfigured = PageRecord::new();

        assert_eq!(d.assess_reading_order(&[configured.clone()]).quality, TagQuality::Good);
        assert_eq!(
            d.assess_reading_order(&[configured, unconfigured.clone()]).quality,
            TagQuality::Poor
        );
        assert_eq!(d.assess_reading_order(&[unconfigured]).quality, TagQuality::Absent);
        // Nothing to configure
        assert_eq!(d.assess_reading_order(&[]).quality, TagQuality::Good);
    }
}
