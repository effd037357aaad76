//! Configuration for a remediation run.
//!
//! Every threshold the heuristics use lives here with its default value, so a
//! run can be reproduced from a JSON file alone.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry thresholds that make an image decorative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorativeThresholds {
    /// Images narrower or shorter than this are decorative (icons, bullets)
    pub min_side: u32,
    /// Images with width/height above this ratio, or below its inverse, are rules and borders
    pub max_aspect_ratio: f64,
    /// Images with a smaller area are decorative
    pub min_area: u64,
    /// Images wider or taller than this are full-page backgrounds
    pub background_side: u32,
}

impl Default for DecorativeThresholds {
    fn default() -> Self {
        Self {
            min_side: 20,
            max_aspect_ratio: 20.0,
            min_area: 400,
            background_side: 1500,
        }
    }
}

/// What counts as adequate alternate text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AltTextPolicy {
    /// Minimum length of trimmed alternate text
    pub min_length: usize,
    /// Phrases that never describe anything, compared case-insensitively
    pub generic_phrases: Vec<String>,
}

impl Default for AltTextPolicy {
    fn default() -> Self {
        let generic_phrases = [
            "image",
            "picture",
            "photo",
            "graphic",
            "img",
            "icon",
            "figure",
            "untitled",
            "screenshot",
            "placeholder",
            "thumbnail",
            "alt",
            "alt text",
        ];
        Self {
            min_length: 5,
            generic_phrases: generic_phrases.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Limits for the rendered-text scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrScanConfig {
    /// Pages examined from the start of the document
    pub max_pages: usize,
    /// Minimum length of a run of control bytes
    pub control_run_length: usize,
    /// A page is CID-suspect with more runs than this
    pub control_run_threshold: usize,
    /// An image wider or taller than this makes a page large-image-suspect
    pub large_image_side: u32,
}

impl Default for OcrScanConfig {
    fn default() -> Self {
        Self {
            max_pages: 3,
            control_run_length: 4,
            control_run_threshold: 10,
            large_image_side: 1500,
        }
    }
}

/// Remediation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemediationConfig {
    /// Decorative image thresholds.
    pub decorative: DecorativeThresholds,

    /// Alternate text quality policy.
    pub alt_text: AltTextPolicy,

    /// Rendered-text scan limits.
    pub ocr_scan: OcrScanConfig,

    /// Configure page reading order when it is missing.
    pub repair_reading_order: bool,

    /// Add summaries to tables that lack one.
    pub summarize_tables: bool,

    /// Describe links whose text is generic.
    pub describe_links: bool,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RemediationConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            decorative: DecorativeThresholds::default(),
            alt_text: AltTextPolicy::default(),
            ocr_scan: OcrScanConfig::default(),
            repair_reading_order: true,
            summarize_tables: true,
            describe_links: true,
        }
    }

    /// Load configuration from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("Loaded remediation config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject inconsistent values.
    pub fn validate(&self) -> Result<()> {
        let ratio = self.decorative.max_aspect_ratio;
        if ratio.is_nan() || ratio <= 1.0 {
            return Err(Error::InvalidConfig(format!(
                "decorative.max_aspect_ratio must be greater than 1, got {}",
                self.decorative.max_aspect_ratio
            )));
        }
        if self.ocr_scan.control_run_length == 0 {
            return Err(Error::InvalidConfig(
                "ocr_scan.control_run_length must be positive".to_string(),
            ));
        }
        if self.ocr_scan.max_pages == 0 {
            return Err(Error::InvalidConfig("ocr_scan.max_pages must be positive".to_string()));
        }
        Ok(())
    }

    /// Set decorative thresholds.
    pub fn with_decorative(mut self, thresholds: DecorativeThresholds) -> Self {
        self.decorative = thresholds;
        self
    }

    /// Set the alternate text policy.
    pub fn with_alt_text_policy(mut self, policy: AltTextPolicy) -> Self {
        self.alt_text = policy;
        self
    }

    /// Set rendered-text scan limits.
    pub fn with_ocr_scan(mut self, scan: OcrScanConfig) -> Self {
        self.ocr_scan = scan;
        self
    }

    /// Enable reading order repair.
    pub fn with_reading_order_repair(mut self, enable: bool) -> Self {
        self.repair_reading_order = enable;
        self
    }

    /// Enable table summaries.
    pub fn with_table_summaries(mut self, enable: bool) -> Self {
        self.summarize_tables = enable;
        self
    }

    /// Enable link descriptions.
    pub fn with_link_descriptions(mut self, enable: bool) -> Self {
        self.describe_links = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RemediationConfig::default();
        assert_eq!(config.decorative.min_side, 20);
        assert_eq!(config.decorative.background_side, 1500);
        assert_eq!(config.ocr_scan.max_pages, 3);
        assert_eq!(config.ocr_scan.control_run_threshold, 10);
        assert!(config.alt_text.generic_phrases.iter().any(|p| p == "photo"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RemediationConfig::new()
            .with_reading_order_repair(false)
            .with_table_summaries(false)
            .with_link_descriptions(false);
        assert!(!config.repair_reading_order);
        assert!(!config.summarize_tables);
        assert!(!config.describe_links);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RemediationConfig =
            serde_json::from_str(r#"{ "ocr_scan": { "max_pages": 5 }, "describe_links": false }"#).unwrap();
        assert_eq!(config.ocr_scan.max_pages, 5);
        assert_eq!(config.ocr_scan.control_run_length, 4);
        assert!(!config.describe_links);
        assert!(config.summarize_tables);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RemediationConfig::default();
        config.decorative.max_aspect_ratio = 0.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = RemediationConfig::default().with_ocr_scan(OcrScanConfig {
            control_run_length: 0,
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "alt_text": {{ "min_length": 8 }} }}"#).unwrap();
        let config = RemediationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.alt_text.min_length, 8);
        // Nested defaults still apply
        assert!(!config.alt_text.generic_phrases.is_empty());
    }

    #[test]
    fn test_from_missing_file() {
        let result = RemediationConfig::from_json_file("/nonexistent/remediate.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
