//! MDM^T02 document notification profile

use crate::engine::{Profile, ValidationResult};
use crate::reporter::{ValidationIssue, codes};
use crate::rules;
use hl7_model::Document;

/// Segments an MDM^T02 message cannot do without
pub const REQUIRED_SEGMENTS: [&str; 3] = ["MSH", "PID", "TXA"];

/// TXA fields that should be filled: document type, activity time, completion status
pub const RECOMMENDED_TXA_FIELDS: [(u32, &str); 3] = [
    (2, "Document Type"),
    (4, "Activity Date/Time"),
    (12, "Completion Status"),
];

/// Structural and semantic checks for MDM^T02 messages
///
/// Missing MSH, PID, or TXA and a missing message type are errors. A type or
/// trigger other than MDM/T02 is only a warning, so related message types
/// still pass, as do missing recommended fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct MdmT02Profile;

impl Profile for MdmT02Profile {
    fn name(&self) -> &str {
        "MDM^T02"
    }

    fn check(&self, doc: &Document, result: &mut ValidationResult) {
        for name in REQUIRED_SEGMENTS {
            if let Some(issue) = rules::require_segment(doc, name) {
                result.add(issue);
            }
        }

        if let Some(msh) = doc.segment("MSH") {
            match msh.non_empty_field(9) {
                None => result.add_error(ValidationIssue::error(
                    codes::MISSING_MESSAGE_TYPE,
                    "MSH-9",
                    "MSH-9 (Message Type) is required",
                )),
                Some(message_type) => {
                    let checks = [
                        (1, "MDM", codes::MESSAGE_TYPE_MISMATCH, "MSH-9.1", "message type"),
                        (2, "T02", codes::TRIGGER_EVENT_MISMATCH, "MSH-9.2", "trigger event"),
                    ];
                    for (component, expected, code, path, what) in checks {
                        if let Some(issue) = rules::expect_component(
                            message_type,
                            component,
                            expected,
                            code,
                            path,
                            what,
                        ) {
                            result.add(issue);
                        }
                    }
                }
            }
        }

        if let Some(pid) = doc.segment("PID") {
            if let Some(issue) =
                rules::recommend_identifier(pid, "PID", 3, "Patient Identifier List")
            {
                result.add(issue);
            }
        }

        if let Some(txa) = doc.segment("TXA") {
            for (position, label) in RECOMMENDED_TXA_FIELDS {
                if let Some(issue) = rules::recommend_field(txa, "TXA", position, label) {
                    result.add(issue);
                }
            }
        }
    }
}

/// True when a parsed message type calls for MDM profile validation
pub fn should_validate_as_mdm(message_type: Option<&str>) -> bool {
    message_type.is_some_and(|t| t.starts_with("MDM"))
}
