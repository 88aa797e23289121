//! Segment representation
#![allow(clippy::must_use_candidate)] // Builder/constructor API intentionally omits pervasive #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent builder methods return Self for ergonomics.

use crate::field::Field;
use crate::index::{self, Dense, Position};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One occurrence of a segment: a sparse map of 1-based field positions
///
/// The segment name (position 0) is not stored here; it is the key the
/// segment is filed under in a [`crate::Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Segment {
    fields: BTreeMap<u32, Field>,
}

impl Segment {
    /// Create an empty segment
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the segment
    pub fn with_field(mut self, index: u32, field: impl Into<Field>) -> Self {
        self.set_field(index, field);
        self
    }

    /// Set a field, returning the previous value at that position
    pub fn set_field(&mut self, index: u32, field: impl Into<Field>) -> Option<Field> {
        self.fields.insert(index, field.into())
    }

    /// Field at a 1-based position
    pub fn field(&self, index: u32) -> Option<&Field> {
        self.fields.get(&index)
    }

    /// Field at a position, treating an all-empty value as absent
    pub fn non_empty_field(&self, index: u32) -> Option<&Field> {
        self.field(index).filter(|field| !field.is_empty())
    }

    /// Stored fields in position order
    pub fn fields(&self) -> impl Iterator<Item = (u32, &Field)> + '_ {
        self.fields.iter().map(|(index, field)| (*index, field))
    }

    /// Every position from 1 to the highest stored one, `None` for gaps
    pub fn dense_fields(&self) -> Dense<'_, Field> {
        index::dense(&self.fields)
    }

    /// Highest stored position, or 0 for an empty segment
    pub fn max_index(&self) -> u32 {
        index::max_position(&self.fields)
    }

    /// Number of stored fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field is stored
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(u32, Field)> for Segment {
    fn from_iter<T: IntoIterator<Item = (u32, Field)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SegmentVisitor;

        impl<'de> Visitor<'de> for SegmentVisitor {
            type Value = Segment;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("an object of fields keyed by numeric position")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = BTreeMap::new();
                while let Some((Position(index), field)) = map.next_entry::<Position, Field>()? {
                    fields.insert(index, field);
                }
                Ok(Segment { fields })
            }
        }

        deserializer.deserialize_map(SegmentVisitor)
    }
}
