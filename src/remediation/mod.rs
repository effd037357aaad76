//! Accessibility structure remediation.
//!
//! The [`Remediator`] runs a fixed sequence of passes over a [`DocumentModel`],
//! each completing before the next starts:
//!
//! 1. **Reading order**: pages are linked to the parent tree and their tab
//!    order set to follow the structure
//! 2. **Images**: every image is described by a `/Figure` or marked as an
//!    `/Artifact` ([`classifier`], [`detector`])
//! 3. **Tag types**: mistyped nodes are retyped by an ordered rule chain
//!    ([`retype`]); images of nodes that became `/Figure` are then assessed
//!    again and described
//! 4. **Headings**: the outline is repaired so no level is skipped
//!    ([`headings`])
//! 5. **Tables, links and forms**: summaries, header audit, link descriptions,
//!    form field names
//! 6. **Artifacts**: any content still untagged is marked as an artifact
//! 7. **Rendered text**: an advisory scan for documents that need OCR first
//!
//! Every pass leaves the structure tree consistent on its own, so stopping
//! between passes never corrupts the document. Heuristics prefer leaving
//! ambiguous content alone; what they leave is listed in the report's review
//! items and counted as unresolved.
//!
//! Running the pipeline a second time makes no structural changes.
//!
//! ## Example
//!
//! ```
//! use pdf_remediate::document::{ContentObject, PageRecord, TaggedDocument};
//! use pdf_remediate::remediation::Remediator;
//!
//! let mut doc = TaggedDocument::new();
//! doc.add_page(PageRecord::new().with_object(ContentObject::image(0, 0, 800, 600)));
//!
//! let report = Remediator::new().run(&mut doc).unwrap();
//! assert_eq!(report.statistics.images_tagged, 1);
//!
//! let again = Remediator::new().run(&mut doc).unwrap();
//! assert_eq!(again.statistics.structural_changes(), 0);
//! ```

pub mod artifacts;
pub mod classifier;
pub mod detector;
pub mod forms;
pub mod headings;
pub mod images;
pub mod links;
pub mod ocr_scan;
pub mod reading_order;
pub mod retype;
mod stats;
pub mod tables;

pub use classifier::{
    AltText, AltTextProvider, AltTextSource, Classification, ContentClassifier,
    DescriptionRequest, HeuristicProvider,
};
pub use detector::{TagAssessment, TagDetector, TagQuality};
pub use ocr_scan::OcrAssessment;
pub use retype::{RoleRule, RuleContext, TagTypeCorrector};
pub use stats::{RemediationStatistics, ReviewCode, ReviewItem, RunLog};

use crate::config::RemediationConfig;
use crate::document::DocumentModel;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Outcome of one remediation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationReport {
    /// Counters
    pub statistics: RemediationStatistics,
    /// Rendered-text verdict
    pub ocr: OcrAssessment,
    /// Items left for a reviewer
    pub review_items: Vec<ReviewItem>,
    /// RFC 3339 timestamp of the run
    pub generated_at: String,
}

impl RemediationReport {
    /// Number of review items that are counted as unresolved.
    pub fn unresolved(&self) -> usize {
        self.statistics.unresolved
    }

    /// Whether the document should go through external OCR before remediation.
    pub fn requires_ocr(&self) -> bool {
        self.ocr.requires_ocr
    }
}

/// Runs the remediation passes.
pub struct Remediator {
    config: RemediationConfig,
    provider: Box<dyn AltTextProvider + Send + Sync>,
    corrector: TagTypeCorrector,
}

impl Default for Remediator {
    fn default() -> Self {
        Self::new()
    }
}

impl Remediator {
    /// Create a remediator with default configuration and no description
    /// provider.
    pub fn new() -> Self {
        Self {
            config: RemediationConfig::default(),
            provider: Box::new(HeuristicProvider),
            corrector: TagTypeCorrector::new(),
        }
    }

    /// Use the given configuration.
    pub fn with_config(mut self, config: RemediationConfig) -> Self {
        self.config = config;
        self
    }

    /// Ask `provider` for image descriptions before falling back to geometry.
    pub fn with_provider(mut self, provider: impl AltTextProvider + Send + Sync + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    /// Replace the tag-type rule chain.
    pub fn with_corrector(mut self, corrector: TagTypeCorrector) -> Self {
        self.corrector = corrector;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &RemediationConfig {
        &self.config
    }

    /// Remediate a document in place.
    ///
    /// Only arena misuse surfaces as an error; anything the heuristics cannot
    /// decide ends up in the report instead.
    pub fn run<D: DocumentModel + ?Sized>(&self, doc: &mut D) -> Result<RemediationReport> {
        self.config.validate()?;
        let detector = TagDetector::new(self.config.alt_text.clone());
        let mut log = RunLog::new();

        log::info!(
            "Remediating document: {} page(s), {} structure node(s)",
            doc.page_count(),
            doc.tree().len()
        );

        if self.config.repair_reading_order {
            reading_order::repair_reading_order(doc, &detector, &mut log)?;
        }

        images::tag_images(doc, &self.config.decorative, &detector, &*self.provider, &mut log)?;
        log::debug!(
            "Images: {} tagged, {} decorative, {} improved, {} skipped",
            log.stats.images_tagged,
            log.stats.decorative_images,
            log.stats.alt_texts_improved,
            log.stats.skipped_already_tagged
        );

        let retyped = self.corrector.run(doc, &mut log)?;
        log::debug!(
            "Tag types: {} retyped, {} moved, {} removed",
            log.stats.tags_retyped,
            log.stats.nodes_rehomed,
            log.stats.nodes_removed
        );
        images::describe_retyped_figures(
            doc,
            &retyped,
            &self.config.decorative,
            &detector,
            &*self.provider,
            &mut log,
        )?;

        headings::repair_headings(doc, &mut log)?;

        tables::audit_tables(doc, &detector, self.config.summarize_tables, &mut log)?;
        if self.config.describe_links {
            links::describe_links(doc, &mut log)?;
        }
        forms::audit_form_fields(&*doc, &mut log)?;

        artifacts::enforce_artifacts(doc, &mut log)?;

        let ocr = ocr_scan::scan_document(doc.pages(), &self.config.ocr_scan, &mut log);

        log::info!(
            "Remediation finished: {} change(s), {} unresolved{}",
            log.stats.structural_changes(),
            log.stats.unresolved,
            if ocr.requires_ocr { ", OCR advised" } else { "" }
        );

        Ok(RemediationReport {
            statistics: log.stats,
            ocr,
            review_items: log.review_items,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

/// Remediate a document with the given configuration and no description
/// provider.
pub fn remediate<D: DocumentModel + ?Sized>(
    doc: &mut D,
    config: RemediationConfig,
) -> Result<RemediationReport> {
    Remediator::new().with_config(config).run(doc)
}
