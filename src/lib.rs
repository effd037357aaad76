// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::match_like_matches_macro)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # PDF Remediate
//!
//! Accessibility remediation for the logical structure of Tagged PDF
//! documents: detect existing tags, describe or mark images, correct
//! mistyped structure elements, repair heading outlines and make sure every
//! piece of content is either tagged or an artifact.
//!
//! ## Core Features
//!
//! - **Existing-Tag Detection**: tri-state (Good / Poor / Absent) answers for
//!   images, tables, headings and reading order
//! - **Image Classification**: decorative vs. descriptive by geometry, with a
//!   pluggable [`AltTextProvider`](remediation::AltTextProvider) and a
//!   geometric fallback
//! - **Tag-Type Correction**: ordered rule chain, role-only retyping, explicit
//!   handling of children the new role cannot hold
//! - **Heading Repair**: deterministic single-pass outline repair
//! - **Artifact Completeness**: every content object referenced exactly once
//! - **Rendered-Text Scan**: advisory "requires OCR" signal
//!
//! ## Architecture
//!
//! The engine never reads or writes PDF files. It works through the
//! [`DocumentModel`](document::DocumentModel) trait over an arena-backed
//! [`StructureTree`](structure::StructureTree). [`TaggedDocument`](document::TaggedDocument)
//! is the in-memory implementation, loadable from a JSON snapshot.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_remediate::document::TaggedDocument;
//! use pdf_remediate::remediation::Remediator;
//!
//! # fn main() -> pdf_remediate::Result<()> {
//! let mut doc = TaggedDocument::from_json_file("snapshot.json")?;
//! let report = Remediator::new().run(&mut doc)?;
//! println!(
//!     "{} change(s), {} item(s) need review",
//!     report.statistics.structural_changes(),
//!     report.unresolved()
//! );
//! doc.to_json_file("remediated.json")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Document model
pub mod document;
pub mod snapshot;
pub mod structure;

// Configuration
pub mod config;

// Remediation passes
pub mod remediation;

pub use config::RemediationConfig;
pub use document::{DocumentModel, TaggedDocument};
pub use error::{Error, Result};
pub use remediation::{remediate, RemediationReport, RemediationStatistics, Remediator};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
