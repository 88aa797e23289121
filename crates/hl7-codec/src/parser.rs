//! HL7 v2 message parser
//!
//! Turns one pipe-delimited message into a [`Document`]. Only an empty input
//! or a missing MSH header stop the parse; a malformed line is skipped and
//! reported as a [`ParseWarning`] so the caller still gets everything that
//! could be read.

use crate::syntax::{Delimiters, HEADER_TAG, MIN_SEGMENT_LENGTH};
use crate::{Error, Result};
use hl7_model::{Components, Document, Field, Segment};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, warn};

static SEGMENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9]{2}$").expect("segment name pattern compiles"));

/// Upper bounds applied while parsing
///
/// Content past a bound is dropped and reported with
/// [`ParseWarning::LimitExceeded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseLimits {
    /// Maximum segment lines read from one message
    pub max_segments: usize,
    /// Maximum fields kept per segment
    pub max_fields_per_segment: usize,
    /// Maximum repetitions kept per field
    pub max_repetitions: usize,
    /// Maximum components kept per field occurrence
    pub max_components: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_segments: 10_000,
            max_fields_per_segment: 1_000,
            max_repetitions: 1_000,
            max_components: 100,
        }
    }
}

/// Non-fatal irregularity found while parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A line that could not be read as a segment and was skipped
    MalformedSegment {
        line: usize,
        content: String,
        reason: String,
    },

    /// A segment kept under the first three characters of an irregular name
    IrregularSegmentName {
        line: usize,
        name: String,
        token: String,
    },

    /// Content dropped because a parse limit was reached
    LimitExceeded {
        line: usize,
        what: &'static str,
        max: usize,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedSegment {
                line,
                content,
                reason,
            } => write!(f, "Skipping invalid segment at line {line} ({reason}): {content}"),
            Self::IrregularSegmentName { line, name, token } => {
                write!(f, "Line {line}: irregular segment name '{token}', filed under '{name}'")
            }
            Self::LimitExceeded { line, what, max } => {
                write!(f, "Line {line}: more than {max} {what}, extra content dropped")
            }
        }
    }
}

/// Result of a successful parse
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Parsed segments
    pub document: Document,
    /// Message type from MSH-9, e.g. `MDM^T02`
    pub message_type: Option<String>,
    /// Skipped lines and truncations
    pub warnings: Vec<ParseWarning>,
    /// Delimiters declared by the message header
    pub delimiters: Delimiters,
}

/// Serializable parse envelope: either a document or an error string
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
}

impl From<Result<ParseOutcome>> for ParseReport {
    fn from(result: Result<ParseOutcome>) -> Self {
        match result {
            Ok(outcome) => Self {
                success: true,
                document: Some(outcome.document),
                message_type: outcome.message_type,
                error: None,
                warnings: (!outcome.warnings.is_empty())
                    .then(|| outcome.warnings.iter().map(ToString::to_string).collect()),
            },
            Err(err) => Self {
                success: false,
                document: None,
                message_type: None,
                error: Some(err.to_string()),
                warnings: None,
            },
        }
    }
}

/// Parser for HL7 v2 messages
#[derive(Debug, Clone, Default)]
pub struct Hl7Parser {
    limits: ParseLimits,
}

impl Hl7Parser {
    /// Create a new parser with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom limits
    pub fn with_limits(limits: ParseLimits) -> Self {
        Self { limits }
    }

    /// Parse a complete message
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] for blank input and
    /// [`Error::MissingHeader`] when the first segment is not MSH.
    pub fn parse(&self, text: &str) -> Result<ParseOutcome> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        // CR, LF, and CRLF all end a segment
        let lines: Vec<&str> = text
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let header = lines.first().copied().unwrap_or_default();
        if !header.starts_with(HEADER_TAG) {
            return Err(Error::MissingHeader);
        }

        let delimiters = Delimiters::from_header(header);
        debug!(
            field = %delimiters.field,
            encoding = %delimiters.encoding_characters(),
            segments = lines.len(),
            "Parsing HL7 message"
        );

        let mut document = Document::new();
        let mut warnings = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let line_number = idx + 1;
            if idx >= self.limits.max_segments {
                warnings.push(ParseWarning::LimitExceeded {
                    line: line_number,
                    what: "segments",
                    max: self.limits.max_segments,
                });
                break;
            }

            match self.parse_segment(line, line_number, &delimiters, &mut warnings) {
                Ok((name, segment)) => document.push_segment(name, segment),
                Err(reason) => warnings.push(ParseWarning::MalformedSegment {
                    line: line_number,
                    content: (*line).to_string(),
                    reason,
                }),
            }
        }

        for warning in &warnings {
            warn!("{warning}");
        }

        let message_type = message_type(&document);
        debug!(
            segments = document.len(),
            message_type = message_type.as_deref().unwrap_or("none"),
            "Finished parsing HL7 message"
        );

        Ok(ParseOutcome {
            document,
            message_type,
            warnings,
            delimiters,
        })
    }

    /// Parse one segment line, returning a skip reason when it is unreadable
    fn parse_segment(
        &self,
        line: &str,
        line_number: usize,
        delimiters: &Delimiters,
        warnings: &mut Vec<ParseWarning>,
    ) -> std::result::Result<(String, Segment), String> {
        if line.chars().count() < MIN_SEGMENT_LENGTH {
            return Err(format!(
                "shorter than {MIN_SEGMENT_LENGTH} characters"
            ));
        }

        // The name is the first three characters of the leading token; any
        // further characters of that token are dropped.
        let mut slices = line.split(delimiters.field);
        let token = slices.next().unwrap_or_default();
        let name = match token.char_indices().nth(3) {
            Some((end, _)) => &token[..end],
            None => token,
        };
        if name.chars().count() < 3 {
            return Err(format!("segment name '{token}' shorter than 3 characters"));
        }
        if !SEGMENT_NAME.is_match(token) {
            warnings.push(ParseWarning::IrregularSegmentName {
                line: line_number,
                name: name.to_string(),
                token: token.to_string(),
            });
        }

        let mut segment = Segment::new();

        // MSH-1 is the field separator itself and MSH-2 the encoding block,
        // which is kept verbatim rather than split on its own delimiters.
        let first_position = if name == HEADER_TAG {
            segment.set_field(1, delimiters.field.to_string());
            if let Some(encoding) = slices.next() {
                segment.set_field(2, encoding);
            }
            3
        } else {
            1
        };

        let mut kept = segment.len();
        for (position, slice) in (first_position..).zip(slices) {
            if kept >= self.limits.max_fields_per_segment {
                warnings.push(ParseWarning::LimitExceeded {
                    line: line_number,
                    what: "fields",
                    max: self.limits.max_fields_per_segment,
                });
                break;
            }
            segment.set_field(position, self.parse_slice(slice, line_number, delimiters, warnings));
            kept += 1;
        }

        Ok((name.to_string(), segment))
    }

    /// Parse a field slice, splitting repetitions first
    fn parse_slice(
        &self,
        slice: &str,
        line_number: usize,
        delimiters: &Delimiters,
        warnings: &mut Vec<ParseWarning>,
    ) -> Field {
        if !slice.contains(delimiters.repetition) {
            return self.parse_field(slice, line_number, delimiters, warnings);
        }

        let mut repetitions = Vec::new();
        for repetition in slice.split(delimiters.repetition) {
            if repetitions.len() >= self.limits.max_repetitions {
                warnings.push(ParseWarning::LimitExceeded {
                    line: line_number,
                    what: "repetitions",
                    max: self.limits.max_repetitions,
                });
                break;
            }
            repetitions.push(self.parse_field(repetition, line_number, delimiters, warnings));
        }

        Field::Repeated(repetitions)
    }

    /// Parse one field occurrence into a simple or composite field
    fn parse_field(
        &self,
        slice: &str,
        line_number: usize,
        delimiters: &Delimiters,
        warnings: &mut Vec<ParseWarning>,
    ) -> Field {
        if !slice.contains(delimiters.component) {
            return Field::simple(slice);
        }

        let mut components = Components::new();
        for (index, component) in (1..).zip(slice.split(delimiters.component)) {
            if components.len() >= self.limits.max_components {
                warnings.push(ParseWarning::LimitExceeded {
                    line: line_number,
                    what: "components",
                    max: self.limits.max_components,
                });
                break;
            }
            // Sub-components stay joined in the component text
            components.insert(index, component.to_string());
        }

        Field::Composite(components)
    }
}

/// Extract the message type from MSH-9
///
/// A composite value yields `code^trigger` when both are present, the code
/// alone when only it is, and `Unknown` otherwise. A simple value is used
/// as-is. Returns `None` when there is no MSH-9.
pub fn message_type(doc: &Document) -> Option<String> {
    let field = doc.segment(HEADER_TAG)?.field(9)?;
    Some(message_type_of(field))
}

fn message_type_of(field: &Field) -> String {
    match field {
        Field::Simple(value) => value.clone(),
        Field::Composite(components) => {
            let code = components.get(&1).filter(|c| !c.is_empty());
            let trigger = components.get(&2).filter(|t| !t.is_empty());
            match (code, trigger) {
                (Some(code), Some(trigger)) => format!("{code}^{trigger}"),
                (Some(code), None) => code.clone(),
                _ => "Unknown".to_string(),
            }
        }
        Field::Repeated(items) => items
            .first()
            .map_or_else(|| "Unknown".to_string(), message_type_of),
    }
}
