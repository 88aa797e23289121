//! Document representation for HL7 v2 messages
#![allow(clippy::must_use_candidate)] // Builder/constructor API intentionally omits pervasive #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent builder methods return Self for ergonomics.

use crate::field::Field;
use crate::path::FieldPath;
use crate::segment::Segment;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::de::value::MapAccessDeserializer;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Segments stored under one name
///
/// The first occurrence is kept as a single segment; a second occurrence
/// promotes the entry to a sequence, and it stays a sequence from then on.
/// In JSON a sequence is an array, which must not be empty; a one-element
/// array reads back as a single occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SegmentEntry {
    /// Exactly one occurrence
    Single(Segment),

    /// Two or more occurrences in source order
    Repeated(Vec<Segment>),
}

impl SegmentEntry {
    /// Add another occurrence, promoting a single entry to a sequence
    pub fn push(&mut self, segment: Segment) {
        match self {
            Self::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Repeated(vec![first, segment]);
            }
            Self::Repeated(segments) => segments.push(segment),
        }
    }

    /// All occurrences in stored order
    pub fn occurrences(&self) -> &[Segment] {
        match self {
            Self::Single(segment) => std::slice::from_ref(segment),
            Self::Repeated(segments) => segments,
        }
    }

    /// First occurrence
    pub fn first(&self) -> Option<&Segment> {
        self.occurrences().first()
    }

    /// True once the entry has been promoted to a sequence
    pub fn is_repeated(&self) -> bool {
        matches!(self, Self::Repeated(_))
    }
}

impl<'de> Deserialize<'de> for SegmentEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SegmentEntryVisitor;

        impl<'de> Visitor<'de> for SegmentEntryVisitor {
            type Value = SegmentEntry;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a segment object or a non-empty array of segment objects")
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                Segment::deserialize(MapAccessDeserializer::new(map)).map(SegmentEntry::Single)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut segments = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(segment) = seq.next_element::<Segment>()? {
                    segments.push(segment);
                }

                match segments.len() {
                    0 => Err(de::Error::invalid_length(0, &self)),
                    1 => Ok(SegmentEntry::Single(segments.remove(0))),
                    _ => Ok(SegmentEntry::Repeated(segments)),
                }
            }
        }

        deserializer.deserialize_any(SegmentEntryVisitor)
    }
}

/// A parsed or built HL7 v2 message
///
/// Segment names keep the order in which they were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    segments: IndexMap<String, SegmentEntry>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment occurrence, returning the document
    pub fn with_segment(mut self, name: impl Into<String>, segment: Segment) -> Self {
        self.push_segment(name, segment);
        self
    }

    /// Add a segment occurrence under `name`, applying single-to-sequence promotion
    pub fn push_segment(&mut self, name: impl Into<String>, segment: Segment) {
        match self.segments.entry(name.into()) {
            Entry::Occupied(mut occupied) => {
                tracing::trace!(segment = %occupied.key(), "repeated segment occurrence");
                occupied.get_mut().push(segment);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(SegmentEntry::Single(segment));
            }
        }
    }

    /// Entry stored under a name
    pub fn entry(&self, name: &str) -> Option<&SegmentEntry> {
        self.segments.get(name)
    }

    /// First occurrence of a segment
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.entry(name).and_then(SegmentEntry::first)
    }

    /// All occurrences of a segment; empty when absent
    pub fn occurrences(&self, name: &str) -> &[Segment] {
        self.entry(name)
            .map(SegmentEntry::occurrences)
            .unwrap_or_default()
    }

    /// Check whether a segment name is present
    pub fn contains(&self, name: &str) -> bool {
        self.segments.contains_key(name)
    }

    /// Segment names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.keys().map(String::as_str)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SegmentEntry)> + '_ {
        self.segments
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of distinct segment names
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the document holds no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total segment occurrences across all names
    pub fn occurrence_count(&self) -> usize {
        self.segments
            .values()
            .map(|entry| entry.occurrences().len())
            .sum()
    }

    /// Field addressed by a path, ignoring its component part
    pub fn field_at(&self, path: &FieldPath) -> Option<&Field> {
        let field = self
            .occurrences(&path.segment)
            .get(path.occurrence)?
            .field(path.field)?;
        field.repetitions().get(path.repetition)
    }

    /// Text addressed by a path
    ///
    /// Without a component part the whole field is returned as long as it is
    /// simple; with one, the component text is returned.
    pub fn value_at(&self, path: &FieldPath) -> Option<&str> {
        let field = self.field_at(path)?;
        match path.component {
            Some(component) => field.component(component),
            None => field.as_simple(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obx(set_id: &str) -> Segment {
        Segment::new().with_field(1, set_id)
    }

    #[test]
    fn test_single_then_promoted() {
        let mut doc = Document::new();
        doc.push_segment("OBX", obx("1"));
        assert!(!doc.entry("OBX").unwrap().is_repeated());
        assert_eq!(doc.occurrences("OBX").len(), 1);

        doc.push_segment("OBX", obx("2"));
        doc.push_segment("OBX", obx("3"));
        let entry = doc.entry("OBX").unwrap();
        assert!(entry.is_repeated());
        assert_eq!(entry.occurrences().len(), 3);
        assert_eq!(
            entry.occurrences()[2].field(1),
            Some(&Field::simple("3"))
        );
    }

    #[test]
    fn test_names_keep_insertion_order() {
        let doc = Document::new()
            .with_segment("MSH", Segment::new())
            .with_segment("TXA", Segment::new())
            .with_segment("PID", Segment::new())
            .with_segment("TXA", Segment::new());

        let names: Vec<&str> = doc.names().collect();
        assert_eq!(names, vec!["MSH", "TXA", "PID"]);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.occurrence_count(), 4);
    }

    #[test]
    fn test_missing_segment_lookups() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert!(doc.segment("PID").is_none());
        assert!(doc.occurrences("PID").is_empty());
        assert!(!doc.contains("PID"));
    }

    #[test]
    fn test_value_at() {
        let pid = Segment::new()
            .with_field(3, Field::from_components(["123456789", "", "", "MRN"]))
            .with_field(8, "M");
        let doc = Document::new()
            .with_segment("PID", pid)
            .with_segment("OBX", obx("1"))
            .with_segment("OBX", obx("2"));

        let path: FieldPath = "PID-3.4".parse().unwrap();
        assert_eq!(doc.value_at(&path), Some("MRN"));

        let path: FieldPath = "PID-8".parse().unwrap();
        assert_eq!(doc.value_at(&path), Some("M"));

        let path: FieldPath = "OBX[1]-1".parse().unwrap();
        assert_eq!(doc.value_at(&path), Some("2"));

        let path: FieldPath = "OBX[2]-1".parse().unwrap();
        assert_eq!(doc.value_at(&path), None);

        // Whole composite field has no single text value
        let path: FieldPath = "PID-3".parse().unwrap();
        assert_eq!(doc.value_at(&path), None);
        assert!(doc.field_at(&path).is_some());
    }

    #[test]
    fn test_document_json_shape() {
        let doc = Document::new()
            .with_segment("MSH", Segment::new().with_field(9, Field::from_components(["MDM", "T02"])))
            .with_segment("OBX", obx("1"))
            .with_segment("OBX", obx("2"));

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "MSH": {"9": {"1": "MDM", "2": "T02"}},
                "OBX": [{"1": "1"}, {"1": "2"}]
            })
        );

        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_document_json_rejects_bad_entries() {
        let bad_key = serde_json::json!({"PID": {"3": "123", "id": "x"}});
        assert!(serde_json::from_value::<Document>(bad_key).is_err());

        let empty_sequence = serde_json::json!({"MSH": {"9": "ACK"}, "OBX": []});
        assert!(serde_json::from_value::<Document>(empty_sequence).is_err());

        let text_segment = serde_json::json!({"PID": "123"});
        assert!(serde_json::from_value::<Document>(text_segment).is_err());
    }

    #[test]
    fn test_document_json_one_element_sequence_is_single() {
        let json = serde_json::json!({"OBX": [{"1": "1", "5": {"1": "a", "3": "c"}}]});
        let doc: Document = serde_json::from_value(json).unwrap();

        let entry = doc.entry("OBX").unwrap();
        assert!(!entry.is_repeated());
        let obx = doc.segment("OBX").unwrap();
        assert_eq!(obx.field(5).unwrap().component(3), Some("c"));
        assert_eq!(obx.field(5).unwrap().component(2), None);
    }
}
