//! Validation findings and report formatting

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural problem; makes the document invalid for the profile
    Error,
    /// Recommended content missing or unexpected; never blocks validity
    Warning,
}

/// Issue codes reported by the built-in rules
pub mod codes {
    pub const MISSING_SEGMENT: &str = "MISSING_SEGMENT";
    pub const MISSING_MESSAGE_TYPE: &str = "MISSING_MESSAGE_TYPE";
    pub const MESSAGE_TYPE_MISMATCH: &str = "MESSAGE_TYPE_MISMATCH";
    pub const TRIGGER_EVENT_MISMATCH: &str = "TRIGGER_EVENT_MISMATCH";
    pub const RECOMMENDED_FIELD: &str = "RECOMMENDED_FIELD";
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Severity level
    pub severity: Severity,
    /// Machine-readable code, see [`codes`]
    pub code: String,
    /// Segment or field path the issue concerns, e.g. `TXA-12`
    pub path: String,
    /// Human-readable message
    pub message: String,
}

impl ValidationIssue {
    /// Build an error-severity issue
    pub fn error(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.to_string(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Build a warning-severity issue
    pub fn warning(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.to_string(),
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Summary form of a validation run: a flag and two message lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Renders validation reports as plain text
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationReporter;

impl ValidationReporter {
    /// Create a new validation reporter
    pub fn new() -> Self {
        Self
    }

    /// One line per finding, followed by a verdict line
    pub fn render_text(&self, report: &ValidationReport) -> String {
        let mut out = String::new();
        for error in &report.errors {
            out.push_str("ERROR: ");
            out.push_str(error);
            out.push('\n');
        }
        for warning in &report.warnings {
            out.push_str("WARNING: ");
            out.push_str(warning);
            out.push('\n');
        }

        let verdict = if report.valid { "valid" } else { "invalid" };
        out.push_str(&format!(
            "Result: {verdict} ({} errors, {} warnings)\n",
            report.errors.len(),
            report.warnings.len()
        ));
        out
    }
}
