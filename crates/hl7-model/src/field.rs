//! Field values for the HL7 model
#![allow(clippy::must_use_candidate)] // Accessor-heavy API intentionally omits pervasive #[must_use].

use crate::index::Position;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sparse component map keyed by 1-based component position
pub type Components = BTreeMap<u32, String>;

/// The value held at one field position of a segment
///
/// In JSON a simple field is a string, a composite an object keyed by
/// component position, and a repeated field an array. Object keys must be
/// whole numbers, and arrays are read through [`Field::repeated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Field {
    /// Text with no internal structure
    Simple(String),

    /// Component-structured value; missing positions render as empty text
    Composite(Components),

    /// Several occurrences of the same field position
    Repeated(Vec<Field>),
}

impl Default for Field {
    fn default() -> Self {
        Self::empty()
    }
}

impl Field {
    /// Create a simple text field
    pub fn simple(value: impl Into<String>) -> Self {
        Self::Simple(value.into())
    }

    /// Create an empty simple field
    pub fn empty() -> Self {
        Self::Simple(String::new())
    }

    /// Create a composite field numbering the given components from 1
    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Composite(
            (1..)
                .zip(components)
                .map(|(index, value)| (index, value.into()))
                .collect(),
        )
    }

    /// Create a composite field holding a single component at `index`
    pub fn component_at(index: u32, value: impl Into<String>) -> Self {
        let mut components = Components::new();
        components.insert(index, value.into());
        Self::Composite(components)
    }

    /// Create a repeated field
    ///
    /// Nested repetitions are flattened into one level. An empty list yields an
    /// empty simple field since a repeated field is never empty.
    pub fn repeated(repetitions: Vec<Field>) -> Self {
        let mut flat = Vec::with_capacity(repetitions.len());
        for repetition in repetitions {
            match repetition {
                Self::Repeated(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }

        if flat.is_empty() {
            Self::empty()
        } else {
            Self::Repeated(flat)
        }
    }

    /// Raw text when this is a simple field
    pub fn as_simple(&self) -> Option<&str> {
        match self {
            Self::Simple(value) => Some(value),
            Self::Composite(_) | Self::Repeated(_) => None,
        }
    }

    /// Component map when this is a composite field
    pub fn as_components(&self) -> Option<&Components> {
        match self {
            Self::Composite(components) => Some(components),
            Self::Simple(_) | Self::Repeated(_) => None,
        }
    }

    /// Occurrences of this field; a non-repeated field is its own single occurrence
    pub fn repetitions(&self) -> &[Field] {
        match self {
            Self::Repeated(items) => items,
            Self::Simple(_) | Self::Composite(_) => std::slice::from_ref(self),
        }
    }

    /// Component text at a 1-based position
    ///
    /// A simple field answers position 1 with its value. A repeated field
    /// answers from its first occurrence.
    pub fn component(&self, index: u32) -> Option<&str> {
        match self {
            Self::Simple(value) => (index == 1).then_some(value.as_str()),
            Self::Composite(components) => components.get(&index).map(String::as_str),
            Self::Repeated(items) => items.first().and_then(|first| first.component(index)),
        }
    }

    /// First component text, or `""` when absent
    pub fn first_component(&self) -> &str {
        self.component(1).unwrap_or_default()
    }

    /// True when every piece of text in the field is empty
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Simple(value) => value.is_empty(),
            Self::Composite(components) => components.values().all(String::is_empty),
            Self::Repeated(items) => items.iter().all(Field::is_empty),
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::Simple(value.to_string())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Self::Simple(value)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldVisitor;

        impl<'de> Visitor<'de> for FieldVisitor {
            type Value = Field;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a string, an object of numbered components, or an array of fields")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Field::simple(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Field::Simple(value))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut components = Components::new();
                while let Some((Position(index), value)) = map.next_entry::<Position, String>()? {
                    components.insert(index, value);
                }
                Ok(Field::Composite(components))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element::<Field>()? {
                    items.push(item);
                }
                Ok(Field::repeated(items))
            }
        }

        deserializer.deserialize_any(FieldVisitor)
    }
}
