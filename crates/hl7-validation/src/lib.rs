#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

//! # hl7-validation
//!
//! Profile validation for HL7 v2 documents.
//!
//! Validation never fails: every finding is collected as an error (blocks
//! validity) or a warning (informational). The built-in profile is MDM^T02.
//!
//! ## Example Usage
//!
//! ```rust
//! use hl7_model::{Document, Field, Segment};
//! use hl7_validation::validate;
//!
//! let doc = Document::new()
//!     .with_segment("MSH", Segment::new().with_field(9, Field::from_components(["MDM", "T02"])))
//!     .with_segment("TXA", Segment::new().with_field(2, "DOC").with_field(4, "20240101").with_field(12, "AU"));
//!
//! let report = validate(&doc);
//! assert!(!report.valid);
//! assert_eq!(report.errors, vec!["Missing required segment: PID"]);
//! ```

pub mod engine;
pub mod profile;
pub mod reporter;
pub mod rules;

// Re-export main types
pub use engine::{Profile, ValidationEngine, ValidationResult};
pub use profile::{MdmT02Profile, should_validate_as_mdm};
pub use reporter::{Severity, ValidationIssue, ValidationReport, ValidationReporter};

use hl7_model::Document;

/// Validate a document against the MDM^T02 profile
pub fn validate(doc: &Document) -> ValidationReport {
    ValidationEngine::new().validate(doc).report()
}
