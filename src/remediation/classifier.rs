//! Decorative/descriptive image classification and alternate text synthesis.

use super::detector::TagDetector;
use crate::config::DecorativeThresholds;
use crate::document::{ContentObject, Dimensions};
use crate::error::Result;

/// Where a description came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltTextSource {
    /// External description provider
    Provider,
    /// Geometric fallback; manual or AI review is advisable
    Heuristic,
    /// No description (decorative content)
    None,
}

/// Alternate text together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltText {
    /// Description text, empty for decorative content
    pub text: String,
    /// Provenance
    pub source: AltTextSource,
}

impl AltText {
    fn none() -> Self {
        Self {
            text: String::new(),
            source: AltTextSource::None,
        }
    }
}

/// Output of [`ContentClassifier::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Whether the image is decorative
    pub is_decorative: bool,
    /// Description for descriptive images
    pub alt_text: AltText,
}

/// What a description provider is asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRequest<'a> {
    /// Page index (0-based)
    pub page_index: usize,
    /// Image geometry, when known
    pub dimensions: Option<Dimensions>,
    /// Alternate text already on the image, if any
    pub existing_text: Option<&'a str>,
}

/// Source of higher-quality image descriptions (vision models, captioning
/// services, a human-curated table).
///
/// Called synchronously. Timeouts and retries belong to the implementation.
/// `Ok(None)` means "no answer" and an error is never fatal: in both cases the
/// geometric fallback is used.
pub trait AltTextProvider {
    /// Describe one image.
    fn describe(&self, request: &DescriptionRequest<'_>) -> Result<Option<String>>;
}

/// Provider that never answers, leaving every description to the geometric
/// fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicProvider;

impl AltTextProvider for HeuristicProvider {
    fn describe(&self, _request: &DescriptionRequest<'_>) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Whether an image of this size is decorative.
///
/// Small images (icons, bullets), thin rules and borders, tiny areas and
/// full-page backgrounds are decorative.
pub fn is_decorative(dimensions: &Dimensions, thresholds: &DecorativeThresholds) -> bool {
    if dimensions.width < thresholds.min_side || dimensions.height < thresholds.min_side {
        return true;
    }

    match dimensions.aspect_ratio() {
        Some(ratio) => {
            if ratio > thresholds.max_aspect_ratio || ratio < 1.0 / thresholds.max_aspect_ratio {
                return true;
            }
        },
        // Zero height
        None => return true,
    }

    dimensions.area() < thresholds.min_area || dimensions.exceeds(thresholds.background_side)
}

/// Low-fidelity description from geometry alone.
pub fn heuristic_alt_text(dimensions: Option<&Dimensions>, page_index: usize) -> String {
    let page = page_index + 1;
    let Some(dims) = dimensions else {
        return format!("Graphic element on page {}", page);
    };

    let ratio = dims.aspect_ratio().unwrap_or(1.0);
    if ratio > 2.0 {
        format!("Diagram or illustration on page {}", page)
    } else if ratio < 0.5 {
        format!("Vertical graphic on page {}", page)
    } else if dims.width > 400 && dims.height > 400 {
        format!("Figure or photograph on page {}", page)
    } else {
        format!("Graphic element on page {}", page)
    }
}

/// Image classifier.
pub struct ContentClassifier<'a> {
    thresholds: &'a DecorativeThresholds,
    detector: &'a TagDetector,
    provider: &'a dyn AltTextProvider,
}

impl<'a> ContentClassifier<'a> {
    /// Create a classifier. Provider answers that fail the detector's quality
    /// check are discarded.
    pub fn new(
        thresholds: &'a DecorativeThresholds,
        detector: &'a TagDetector,
        provider: &'a dyn AltTextProvider,
    ) -> Self {
        Self {
            thresholds,
            detector,
            provider,
        }
    }

    /// Classify an image and, when it is descriptive, produce alternate text.
    ///
    /// Images without geometry are never decorative.
    pub fn classify(&self, object: &ContentObject, existing_text: Option<&str>) -> Classification {
        let decorative = object
            .dimensions
            .as_ref()
            .is_some_and(|d| is_decorative(d, self.thresholds));
        if decorative {
            return Classification {
                is_decorative: true,
                alt_text: AltText::none(),
            };
        }

        Classification {
            is_decorative: false,
            alt_text: self.describe(object, existing_text),
        }
    }

    fn describe(&self, object: &ContentObject, existing_text: Option<&str>) -> AltText {
        let request = DescriptionRequest {
            page_index: object.page_index,
            dimensions: object.dimensions,
            existing_text,
        };

        match self.provider.describe(&request) {
            Ok(Some(text)) if self.detector.is_quality_alt_text(&text) => {
                return AltText {
                    text: text.trim().to_string(),
                    source: AltTextSource::Provider,
                };
            },
            Ok(Some(text)) => {
                log::debug!(
                    "Discarding provider description {:?} for MCID {} on page {}",
                    text,
                    object.mcid,
                    object.page_index + 1
                );
            },
            Ok(None) => {},
            Err(e) => {
                log::warn!(
                    "Description provider failed for MCID {} on page {}: {}",
                    object.mcid,
                    object.page_index + 1,
                    e
                );
            },
        }

        AltText {
            text: heuristic_alt_text(object.dimensions.as_ref(), object.page_index),
            source: AltTextSource::Heuristic,
        }
    }
}
