//! Rendered-text heuristic scanner.
//!
//! Documents whose text is drawn as images or as raw CID glyph codes cannot be
//! remediated from their structure alone. The scan looks at the first few pages
//! for two cheap indicators and raises an advisory "requires OCR" signal.

use super::stats::{ReviewCode, ReviewItem, RunLog};
use crate::config::OcrScanConfig;
use crate::document::{ContentKind, PageRecord};
use serde::{Deserialize, Serialize};

/// Document-level OCR verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrAssessment {
    /// Whether the document should go through external OCR first
    pub requires_ocr: bool,
    /// Pages examined
    pub pages_scanned: usize,
    /// Pages with many runs of control bytes in their content stream
    pub cid_suspect_pages: usize,
    /// Pages with an image larger than the large-image limit
    pub large_image_pages: usize,
    /// Human-readable explanation with the indicator counts
    pub rationale: String,
}

/// Count maximal runs of at least `min_len` consecutive bytes below 32.
pub fn count_control_runs(bytes: &[u8], min_len: usize) -> usize {
    let mut runs = 0;
    let mut current = 0;
    for &b in bytes {
        if b < 32 {
            current += 1;
        } else {
            if current >= min_len {
                runs += 1;
            }
            current = 0;
        }
    }
    if current >= min_len {
        runs += 1;
    }
    runs
}

/// Whether a page's content stream looks like raw glyph codes.
pub fn is_cid_suspect(page: &PageRecord, config: &OcrScanConfig) -> bool {
    count_control_runs(&page.content_bytes, config.control_run_length) > config.control_run_threshold
}

/// Whether a page carries an image larger than the limit on either side.
pub fn is_large_image_suspect(page: &PageRecord, config: &OcrScanConfig) -> bool {
    page.content_objects.iter().any(|o| {
        o.kind == ContentKind::Image
            && o.dimensions.is_some_and(|d| d.exceeds(config.large_image_side))
    })
}

/// Scan the leading pages. Never fails and never mutates the document.
pub fn scan_pages(pages: &[PageRecord], config: &OcrScanConfig) -> OcrAssessment {
    let mut assessment = OcrAssessment::default();

    for (index, page) in pages.iter().take(config.max_pages).enumerate() {
        assessment.pages_scanned += 1;
        let cid = is_cid_suspect(page, config);
        let large = is_large_image_suspect(page, config);
        if cid {
            assessment.cid_suspect_pages += 1;
        }
        if large {
            assessment.large_image_pages += 1;
        }
        if cid || large {
            log::debug!(
                "Page {} rendered-text indicators: cid={} large_image={}",
                index + 1,
                cid,
                large
            );
        }
    }

    let cid = assessment.cid_suspect_pages;
    let large = assessment.large_image_pages;
    assessment.requires_ocr = (cid > 0 && large > 0) || cid >= 2 || large >= 2;
    assessment.rationale = format!(
        "{} of {} scanned page(s) look CID-encoded, {} carry page-sized images",
        cid, assessment.pages_scanned, large
    );
    assessment
}

/// Scan and record the outcome in the run log.
pub fn scan_document(pages: &[PageRecord], config: &OcrScanConfig, log: &mut RunLog) -> OcrAssessment {
    let assessment = scan_pages(pages, config);
    log.stats.ocr_flagged_pages += pages
        .iter()
        .take(config.max_pages)
        .filter(|p| is_cid_suspect(p, config) || is_large_image_suspect(p, config))
        .count();

    if assessment.requires_ocr {
        log.advise(ReviewItem::new(
            ReviewCode::RequiresOcr,
            format!("Text appears to be rendered as graphics: {}", assessment.rationale),
        ));
    }
    assessment
}
