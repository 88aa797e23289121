//! Gap-filling iteration over sparse 1-based maps
//!
//! Fields within a segment and components within a field are stored sparsely,
//! keyed by their 1-based position. Serialization needs every position from 1
//! up to the highest one present, so [`dense`] walks that range and yields
//! `None` for the holes. Position 0 is never visited.

use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

/// Iterator over `1..=max` positions of a sparse map
#[derive(Debug, Clone)]
pub struct Dense<'a, V> {
    map: &'a BTreeMap<u32, V>,
    positions: RangeInclusive<u32>,
}

/// Iterate every position from 1 to the highest key, filling gaps with `None`.
pub fn dense<V>(map: &BTreeMap<u32, V>) -> Dense<'_, V> {
    Dense {
        map,
        positions: 1..=max_position(map),
    }
}

/// Highest position present in the map, or 0 when empty.
pub fn max_position<V>(map: &BTreeMap<u32, V>) -> u32 {
    map.keys().next_back().copied().unwrap_or(0)
}

impl<'a, V> Iterator for Dense<'a, V> {
    type Item = (u32, Option<&'a V>);

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.positions.next()?;
        Some((position, self.map.get(&position)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

/// Map key naming a 1-based position
///
/// JSON object keys arrive as text and YAML keys may arrive as integers, so
/// both are accepted. Anything that is not a whole number fitting `u32` is
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position(pub(crate) u32);

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PositionVisitor;

        impl Visitor<'_> for PositionVisitor {
            type Value = Position;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a numeric position such as \"3\"")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse()
                    .map(Position)
                    .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u32::try_from(value)
                    .map(Position)
                    .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u32::try_from(value)
                    .map(Position)
                    .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
            }
        }

        deserializer.deserialize_any(PositionVisitor)
    }
}
