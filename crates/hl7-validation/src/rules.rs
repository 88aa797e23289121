//! Validation rules
//!
//! Small presence and value checks that profiles compose. Each returns the
//! issue to record, or `None` when the check passes.

use crate::reporter::{ValidationIssue, codes};
use hl7_model::{Document, Field, Segment};

/// Error when a required segment is absent
pub fn require_segment(doc: &Document, name: &str) -> Option<ValidationIssue> {
    (!doc.contains(name)).then(|| {
        ValidationIssue::error(
            codes::MISSING_SEGMENT,
            name,
            format!("Missing required segment: {name}"),
        )
    })
}

/// Warning when a recommended field is absent or holds only empty text
pub fn recommend_field(
    segment: &Segment,
    name: &str,
    position: u32,
    label: &str,
) -> Option<ValidationIssue> {
    segment.non_empty_field(position).is_none().then(|| {
        ValidationIssue::warning(
            codes::RECOMMENDED_FIELD,
            format!("{name}-{position}"),
            format!("{name}-{position} ({label}) is recommended"),
        )
    })
}

/// Warning when no occurrence of a recommended field has a first component
pub fn recommend_identifier(
    segment: &Segment,
    name: &str,
    position: u32,
    label: &str,
) -> Option<ValidationIssue> {
    segment
        .field(position)
        .is_none_or(|field| {
            field
                .repetitions()
                .iter()
                .all(|repetition| repetition.first_component().is_empty())
        })
        .then(|| {
            ValidationIssue::warning(
                codes::RECOMMENDED_FIELD,
                format!("{name}-{position}"),
                format!("{name}-{position} ({label}) is recommended"),
            )
        })
}

/// Warning when a component does not hold the expected value
pub fn expect_component(
    field: &Field,
    component: u32,
    expected: &str,
    code: &str,
    path: &str,
    what: &str,
) -> Option<ValidationIssue> {
    let found = field.component(component).unwrap_or_default();
    (found != expected).then(|| {
        let found = if found.is_empty() { "(none)" } else { found };
        ValidationIssue::warning(
            code,
            path,
            format!("Expected {what} {expected}, found: {found}"),
        )
    })
}
