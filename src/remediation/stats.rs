//! Statistics and review items produced by a remediation run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Counters accumulated over one remediation run.
///
/// Counters only ever grow. Corrections and unresolved items are kept apart so a
/// reviewer can see exactly what still needs manual attention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationStatistics {
    /// Figure nodes created for untagged images
    pub images_tagged: usize,
    /// Artifact nodes created for decorative images
    pub decorative_images: usize,
    /// Images that already carried an adequate tag or artifact marking
    pub skipped_already_tagged: usize,
    /// Figures whose weak alternate text was replaced
    pub alt_texts_improved: usize,
    /// Descriptions produced by the geometric fallback (review advisable)
    pub heuristic_alt_texts: usize,
    /// Descriptions produced by a configured description provider
    pub provider_alt_texts: usize,
    /// Nodes whose role was corrected
    pub tags_retyped: usize,
    /// Children moved out of a retyped node
    pub nodes_rehomed: usize,
    /// Structurally invalid nodes removed after a retype
    pub nodes_removed: usize,
    /// Headings whose level was rewritten
    pub headings_repaired: usize,
    /// Artifact nodes created for unreferenced content
    pub artifacts_marked: usize,
    /// Pages whose reading order was configured
    pub reading_order_fixed: usize,
    /// Tables given a summary
    pub tables_summarized: usize,
    /// Tables without any header cell
    pub tables_missing_headers: usize,
    /// Links given a description
    pub links_described: usize,
    /// Form fields without an accessible name
    #[serde(default)]
    pub form_fields_unlabeled: usize,
    /// Scanned pages with at least one rendered-text indicator
    pub ocr_flagged_pages: usize,
    /// Items left untouched that need manual review
    pub unresolved: usize,
}

impl RemediationStatistics {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of structural changes made to the document.
    ///
    /// Zero when the run found nothing left to fix.
    pub fn structural_changes(&self) -> usize {
        self.images_tagged
            + self.decorative_images
            + self.alt_texts_improved
            + self.tags_retyped
            + self.nodes_rehomed
            + self.nodes_removed
            + self.headings_repaired
            + self.artifacts_marked
            + self.reading_order_fixed
            + self.tables_summarized
            + self.links_described
    }

    /// Add another run's counters to this one.
    pub fn merge(&mut self, other: &RemediationStatistics) {
        self.images_tagged += other.images_tagged;
        self.decorative_images += other.decorative_images;
        self.skipped_already_tagged += other.skipped_already_tagged;
        self.alt_texts_improved += other.alt_texts_improved;
        self.heuristic_alt_texts += other.heuristic_alt_texts;
        self.provider_alt_texts += other.provider_alt_texts;
        self.tags_retyped += other.tags_retyped;
        self.nodes_rehomed += other.nodes_rehomed;
        self.nodes_removed += other.nodes_removed;
        self.headings_repaired += other.headings_repaired;
        self.artifacts_marked += other.artifacts_marked;
        self.reading_order_fixed += other.reading_order_fixed;
        self.tables_summarized += other.tables_summarized;
        self.tables_missing_headers += other.tables_missing_headers;
        self.links_described += other.links_described;
        self.form_fields_unlabeled += other.form_fields_unlabeled;
        self.ocr_flagged_pages += other.ocr_flagged_pages;
        self.unresolved += other.unresolved;
    }
}

/// Kinds of items that need a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewCode {
    /// Figure with weak alternate text on an image that looks decorative
    AmbiguousFigure,
    /// Generated description from the geometric fallback
    HeuristicDescription,
    /// Node references content that does not exist
    DanglingContentReference,
    /// Content referenced by more than one node
    DuplicateContentReference,
    /// Table without header cells
    TableMissingHeaders,
    /// Form field without an accessible name
    FormFieldUnlabeled,
    /// Document looks graphically rendered
    RequiresOcr,
}

impl fmt::Display for ReviewCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ReviewCode::AmbiguousFigure => "REVIEW-FIG-001",
            ReviewCode::HeuristicDescription => "REVIEW-FIG-002",
            ReviewCode::DanglingContentReference => "REVIEW-STRUCT-001",
            ReviewCode::DuplicateContentReference => "REVIEW-STRUCT-002",
            ReviewCode::TableMissingHeaders => "REVIEW-TBL-001",
            ReviewCode::FormFieldUnlabeled => "REVIEW-FORM-001",
            ReviewCode::RequiresOcr => "REVIEW-OCR-001",
        };
        write!(f, "{}", code)
    }
}

/// Something the engine deliberately left for a reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    /// Item code.
    pub code: ReviewCode,
    /// Human-readable message.
    pub message: String,
    /// Location in the document (if applicable).
    pub location: Option<String>,
}

impl ReviewItem {
    /// Create a new review item.
    pub fn new(code: ReviewCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ReviewItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref loc) = self.location {
            write!(f, " (at {})", loc)?;
        }
        Ok(())
    }
}

/// Accumulator threaded through every pass.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    /// Counters
    pub stats: RemediationStatistics,
    /// Review items in the order they were found
    pub review_items: Vec<ReviewItem>,
}

impl RunLog {
    /// Create an empty run log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item for manual review and count it as unresolved.
    pub fn unresolved(&mut self, item: ReviewItem) {
        log::warn!("{}", item);
        self.stats.unresolved += 1;
        self.review_items.push(item);
    }

    /// Record an advisory item without counting it as unresolved.
    pub fn advise(&mut self, item: ReviewItem) {
        log::info!("{}", item);
        self.review_items.push(item);
    }
}
