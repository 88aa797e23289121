//! HL7 v2 message generator
//!
//! Writes a [`Document`] back to pipe-delimited text. Output always uses the
//! canonical delimiters regardless of what the source message declared, so
//! parse followed by generate canonicalizes a message.

use crate::syntax::{Delimiters, HEADER_TAG};
use crate::{Error, Result};
use hl7_model::{Components, Document, Field, Segment, dense};
use tracing::{debug, trace, warn};

/// Segment order of the MDM^T02 profile
pub const MDM_T02_SEGMENT_ORDER: [&str; 5] = ["MSH", "PID", "PV1", "TXA", "OBX"];

/// Highest field or component position the generator will emit
pub const MAX_POSITION: u32 = 65_535;

/// Separator placed between generated segments
pub const SEGMENT_TERMINATOR: &str = "\r";

/// Which segments to emit and in what order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOrder {
    /// Emit only the listed names, in this order
    Fixed(Vec<String>),
    /// Emit every segment in the document's stored order
    Document,
}

impl Default for SegmentOrder {
    fn default() -> Self {
        Self::mdm_t02()
    }
}

impl SegmentOrder {
    /// The MDM^T02 order: MSH, PID, PV1, TXA, OBX
    pub fn mdm_t02() -> Self {
        Self::fixed(MDM_T02_SEGMENT_ORDER)
    }

    /// A caller-supplied list of segment names
    pub fn fixed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fixed(names.into_iter().map(Into::into).collect())
    }

    /// Follow the document's own segment order
    pub fn document_order() -> Self {
        Self::Document
    }

    /// Parse a comma-separated name list, or `document` for stored order
    pub fn parse_list(list: &str) -> Self {
        if list.trim().eq_ignore_ascii_case("document") {
            return Self::Document;
        }
        Self::fixed(
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_ascii_uppercase),
        )
    }
}

/// Generator for HL7 v2 messages
#[derive(Debug, Clone, Default)]
pub struct Hl7Generator {
    order: SegmentOrder,
    delimiters: Delimiters,
}

impl Hl7Generator {
    /// Create a generator using the MDM^T02 segment order
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with an explicit segment order
    pub fn with_order(order: SegmentOrder) -> Self {
        Self {
            order,
            delimiters: Delimiters::default(),
        }
    }

    /// Segment order in use
    pub fn order(&self) -> &SegmentOrder {
        &self.order
    }

    /// Generate the message text, one segment per CR-separated line
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDocument`] when the document has no segments and
    /// [`Error::PositionOutOfRange`] when a position exceeds [`MAX_POSITION`].
    pub fn generate(&self, doc: &Document) -> Result<String> {
        if doc.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let mut lines = Vec::new();
        match &self.order {
            SegmentOrder::Fixed(names) => {
                for name in names {
                    for segment in doc.occurrences(name) {
                        lines.push(self.encode_segment(name, segment)?);
                    }
                }
                for name in doc.names().filter(|n| !names.iter().any(|o| o.as_str() == *n)) {
                    debug!(segment = name, "Segment not in generation order, skipped");
                }
            }
            SegmentOrder::Document => {
                for (name, entry) in doc.iter() {
                    for segment in entry.occurrences() {
                        lines.push(self.encode_segment(name, segment)?);
                    }
                }
            }
        }

        if lines.is_empty() {
            warn!("No document segments matched the generation order");
        }
        debug!(segments = lines.len(), "Generated HL7 message");

        Ok(lines.join(SEGMENT_TERMINATOR))
    }

    /// Encode one segment occurrence without a terminator
    ///
    /// Positions from 1 to the highest stored one are written, gaps as empty
    /// text. For MSH, positions 1 and 2 are always the canonical field
    /// separator and encoding characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfRange`] for a position above [`MAX_POSITION`].
    pub fn encode_segment(&self, name: &str, segment: &Segment) -> Result<String> {
        check_position(name, segment.max_index())?;

        let field_separator = self.delimiters.field;
        let mut out = String::from(name);

        let skip = if name == HEADER_TAG {
            out.push(field_separator);
            out.push_str(&self.delimiters.encoding_characters());
            2
        } else {
            0
        };

        for (_, field) in segment.dense_fields().skip(skip) {
            out.push(field_separator);
            if let Some(field) = field {
                out.push_str(&self.encode_field(name, field)?);
            }
        }

        trace!(segment = name, line = %out, "Encoded segment");
        Ok(out)
    }

    /// Encode one field's text
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfRange`] for a component above [`MAX_POSITION`].
    pub fn encode_field(&self, segment: &str, field: &Field) -> Result<String> {
        match field {
            Field::Simple(value) => {
                if value.chars().any(|c| self.delimiters.is_delimiter(c)) {
                    debug!(segment, value = %value, "Field text contains an unescaped delimiter");
                }
                Ok(value.clone())
            }
            Field::Composite(components) => self.encode_components(segment, components),
            Field::Repeated(items) => {
                let encoded = items
                    .iter()
                    .map(|item| self.encode_field(segment, item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(encoded.join(self.delimiters.repetition.to_string().as_str()))
            }
        }
    }

    fn encode_components(&self, segment: &str, components: &Components) -> Result<String> {
        check_position(segment, hl7_model::index::max_position(components))?;

        let parts: Vec<&str> = dense(components)
            .map(|(_, value)| value.map_or("", String::as_str))
            .collect();
        Ok(parts.join(self.delimiters.component.to_string().as_str()))
    }
}

fn check_position(segment: &str, position: u32) -> Result<()> {
    if position > MAX_POSITION {
        return Err(Error::PositionOutOfRange {
            segment: segment.to_string(),
            position,
            max: MAX_POSITION,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msh() -> Segment {
        Segment::new()
            .with_field(1, "|")
            .with_field(2, "^~\\&")
            .with_field(3, "APP")
            .with_field(9, Field::from_components(["MDM", "T02"]))
    }

    #[test]
    fn test_empty_document() {
        let err = Hl7Generator::new().generate(&Document::new()).unwrap_err();
        assert_eq!(err, Error::EmptyDocument);
    }

    #[test]
    fn test_gap_filling_between_fields() {
        let segment = Segment::new().with_field(1, "A").with_field(5, "E");
        let line = Hl7Generator::new().encode_segment("PID", &segment).unwrap();
        assert_eq!(line, "PID|A||||E");
    }

    #[test]
    fn test_msh_uses_canonical_encoding() {
        let custom = Segment::new()
            .with_field(1, "#")
            .with_field(2, "*@!%")
            .with_field(3, "APP");
        let line = Hl7Generator::new().encode_segment("MSH", &custom).unwrap();
        assert_eq!(line, "MSH|^~\\&|APP");

        let bare = Hl7Generator::new()
            .encode_segment("MSH", &Segment::new())
            .unwrap();
        assert_eq!(bare, "MSH|^~\\&");
    }

    #[test]
    fn test_component_gap_filling() {
        let mut components = Components::new();
        components.insert(1, "DOE".to_string());
        components.insert(3, "Q".to_string());
        let field = Field::Composite(components);

        assert_eq!(
            Hl7Generator::new().encode_field("PID", &field).unwrap(),
            "DOE^^Q"
        );
    }

    #[test]
    fn test_repetitions() {
        let field = Field::repeated(vec![
            Field::from_components(["A", "B"]),
            Field::simple("C"),
        ]);
        assert_eq!(
            Hl7Generator::new().encode_field("PID", &field).unwrap(),
            "A^B~C"
        );
    }

    #[test]
    fn test_fixed_order_and_join() {
        let doc = Document::new()
            .with_segment("OBX", Segment::new().with_field(1, "1"))
            .with_segment("TXA", Segment::new().with_field(1, "1"))
            .with_segment("MSH", msh())
            .with_segment("ZZZ", Segment::new().with_field(1, "custom"))
            .with_segment("OBX", Segment::new().with_field(1, "2"));

        let text = Hl7Generator::new().generate(&doc).unwrap();
        assert_eq!(
            text,
            "MSH|^~\\&|APP||||||MDM^T02\rTXA|1\rOBX|1\rOBX|2"
        );
        assert!(!text.ends_with('\r'));
    }

    #[test]
    fn test_document_order_keeps_custom_segments() {
        let doc = Document::new()
            .with_segment("MSH", msh())
            .with_segment("ZZZ", Segment::new().with_field(1, "custom"));

        let text = Hl7Generator::with_order(SegmentOrder::document_order())
            .generate(&doc)
            .unwrap();
        assert!(text.ends_with("\rZZZ|custom"));
    }

    #[test]
    fn test_caller_supplied_order() {
        let doc = Document::new()
            .with_segment("MSH", msh())
            .with_segment("EVN", Segment::new().with_field(1, "A01"))
            .with_segment("PID", Segment::new().with_field(1, "1"));

        let order = SegmentOrder::parse_list("msh, evn ,pid");
        assert_eq!(order, SegmentOrder::fixed(["MSH", "EVN", "PID"]));

        let text = Hl7Generator::with_order(order).generate(&doc).unwrap();
        let names: Vec<&str> = text.split('\r').map(|l| &l[..3]).collect();
        assert_eq!(names, vec!["MSH", "EVN", "PID"]);
    }

    #[test]
    fn test_position_zero_is_ignored() {
        let segment = Segment::new().with_field(0, "PID").with_field(2, "x");
        let line = Hl7Generator::new().encode_segment("PID", &segment).unwrap();
        assert_eq!(line, "PID||x");
    }

    #[test]
    fn test_position_out_of_range() {
        let segment = Segment::new().with_field(MAX_POSITION + 1, "x");
        let err = Hl7Generator::new()
            .encode_segment("OBX", &segment)
            .unwrap_err();
        assert!(matches!(err, Error::PositionOutOfRange { position, .. } if position == MAX_POSITION + 1));
    }
}
