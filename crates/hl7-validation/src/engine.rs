//! Validation engine

use crate::profile::MdmT02Profile;
use crate::reporter::{Severity, ValidationIssue, ValidationReport};
use hl7_model::Document;
use tracing::debug;

/// A set of rules a document can be checked against
pub trait Profile: Send + Sync {
    /// Profile name, e.g. `MDM^T02`
    fn name(&self) -> &str;

    /// Record every finding for `doc` into `result`
    fn check(&self, doc: &Document, result: &mut ValidationResult);
}

/// Validation result
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed
    pub is_valid: bool,
    /// List of errors found
    pub errors: Vec<ValidationIssue>,
    /// List of warnings found
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new valid result
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationIssue) {
        self.errors.push(error);
        self.is_valid = false;
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationIssue) {
        self.warnings.push(warning);
    }

    /// Add an issue to the list matching its severity
    pub fn add(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.add_error(issue),
            Severity::Warning => self.add_warning(issue),
        }
    }

    /// Summarize as message lists
    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            valid: self.is_valid,
            errors: self.errors.iter().map(ToString::to_string).collect(),
            warnings: self.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

/// Main validation engine
pub struct ValidationEngine {
    profile: Box<dyn Profile>,
}

impl ValidationEngine {
    /// Create an engine for the MDM^T02 profile
    pub fn new() -> Self {
        Self::with_profile(MdmT02Profile)
    }

    /// Create an engine for a specific profile
    pub fn with_profile(profile: impl Profile + 'static) -> Self {
        Self {
            profile: Box::new(profile),
        }
    }

    /// Name of the profile being checked
    pub fn profile_name(&self) -> &str {
        self.profile.name()
    }

    /// Validate a complete document
    ///
    /// Never fails: every finding is collected into the result.
    pub fn validate(&self, doc: &Document) -> ValidationResult {
        let mut result = ValidationResult::valid();
        self.profile.check(doc, &mut result);

        for issue in result.errors.iter().chain(&result.warnings) {
            debug!(
                profile = self.profile.name(),
                code = %issue.code,
                path = %issue.path,
                "{}",
                issue.message
            );
        }
        debug!(
            profile = self.profile.name(),
            valid = result.is_valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Validation finished"
        );

        result
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::codes;
    use hl7_model::Segment;

    struct RequireZpd;

    impl Profile for RequireZpd {
        fn name(&self) -> &str {
            "ZPD"
        }

        fn check(&self, doc: &Document, result: &mut ValidationResult) {
            if !doc.contains("ZPD") {
                result.add(ValidationIssue::error(
                    codes::MISSING_SEGMENT,
                    "ZPD",
                    "Missing required segment: ZPD",
                ));
            }
            result.add(ValidationIssue::warning(codes::RECOMMENDED_FIELD, "ZPD-1", "note"));
        }
    }

    #[test]
    fn test_result_tracks_validity() {
        let mut result = ValidationResult::valid();
        result.add_warning(ValidationIssue::warning(codes::RECOMMENDED_FIELD, "X", "w"));
        assert!(result.is_valid);
        assert!(result.has_warnings());

        result.add_error(ValidationIssue::error(codes::MISSING_SEGMENT, "X", "e"));
        assert!(!result.is_valid);
        assert!(result.has_errors());
    }

    #[test]
    fn test_custom_profile() {
        let engine = ValidationEngine::with_profile(RequireZpd);
        assert_eq!(engine.profile_name(), "ZPD");

        let doc = Document::new().with_segment("MSH", Segment::new());
        let report = engine.validate(&doc).report();
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Missing required segment: ZPD"]);
        assert_eq!(report.warnings, vec!["note"]);

        let doc = doc.with_segment("ZPD", Segment::new());
        assert!(engine.validate(&doc).is_valid);
    }

    #[test]
    fn test_default_engine_is_mdm() {
        assert_eq!(ValidationEngine::new().profile_name(), "MDM^T02");
    }
}
