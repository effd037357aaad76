//! Page reading-order configuration.

use super::detector::{TagDetector, TagQuality};
use super::stats::RunLog;
use crate::document::{DocumentModel, TabOrder};
use crate::error::Result;

/// Link every unconfigured page to the parent tree and make its tab order
/// follow the structure.
///
/// An existing `/StructParents` key is kept; only missing ones are set, to the
/// page index.
pub fn repair_reading_order<D: DocumentModel + ?Sized>(
    doc: &mut D,
    detector: &TagDetector,
    log: &mut RunLog,
) -> Result<()> {
    if detector.assess_reading_order(doc.pages()).quality == TagQuality::Good {
        log::debug!("Reading order already follows the structure tree");
        return Ok(());
    }

    for index in 0..doc.page_count() {
        let page = doc.page_mut(index)?;
        if page.reading_order_configured() {
            continue;
        }
        if page.struct_parents.is_none() {
            page.struct_parents = Some(index as u32);
        }
        page.tab_order = TabOrder::Structure;
        log.stats.reading_order_fixed += 1;
        log::debug!("Configured reading order on page {}", index + 1);
    }

    Ok(())
}
