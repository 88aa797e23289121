//! Field path addressing
//!
//! A path names one value inside a document:
//!
//! ```text
//! SEG[occurrence]-FIELD[repetition].COMPONENT
//! ```
//!
//! Occurrence and repetition are 0-based and default to 0; field and
//! component are 1-based. `PID-3`, `OBX[1]-5`, `PID-3[1].1` and `MSH-9.2`
//! are all valid.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Parsed field address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    /// Three-character segment name
    pub segment: String,
    /// 0-based segment occurrence
    pub occurrence: usize,
    /// 1-based field position
    pub field: u32,
    /// 0-based repetition within the field
    pub repetition: usize,
    /// 1-based component position, if addressed
    pub component: Option<u32>,
}

impl FieldPath {
    /// Address a field of the first occurrence of a segment
    pub fn new(segment: impl Into<String>, field: u32) -> Self {
        Self {
            segment: segment.into(),
            occurrence: 0,
            field,
            repetition: 0,
            component: None,
        }
    }

    /// Narrow the path to one component
    #[must_use]
    pub fn with_component(mut self, component: u32) -> Self {
        self.component = Some(component);
        self
    }
}

/// Split `NAME[3]` into `("NAME", Some(3))`.
fn split_index<'a>(path: &str, part: &'a str) -> Result<(&'a str, Option<usize>)> {
    let Some(open) = part.find('[') else {
        return Ok((part, None));
    };

    let close = part
        .find(']')
        .ok_or_else(|| Error::invalid_path(path, format!("unclosed bracket in '{part}'")))?;
    if close < open || close != part.len() - 1 {
        return Err(Error::invalid_path(
            path,
            format!("misplaced bracket in '{part}'"),
        ));
    }

    let index = part[open + 1..close]
        .parse()
        .map_err(|_| Error::invalid_path(path, format!("invalid index in '{part}'")))?;
    Ok((&part[..open], Some(index)))
}

fn parse_position(path: &str, text: &str, what: &str) -> Result<u32> {
    match text.parse::<u32>() {
        Ok(0) => Err(Error::invalid_path(path, format!("{what} positions start at 1"))),
        Ok(position) => Ok(position),
        Err(_) => Err(Error::invalid_path(
            path,
            format!("{what} position '{text}' is not a number"),
        )),
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let (head, tail) = path
            .split_once('-')
            .ok_or_else(|| Error::invalid_path(path, "expected '-' between segment and field"))?;

        let (segment, occurrence) = split_index(path, head)?;
        if segment.len() != 3 || !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::invalid_path(
                path,
                format!("segment name '{segment}' must be three letters or digits"),
            ));
        }

        let (field_part, component_part) = match tail.split_once('.') {
            Some((field_part, component_part)) => (field_part, Some(component_part)),
            None => (tail, None),
        };

        let (field_text, repetition) = split_index(path, field_part)?;
        let field = parse_position(path, field_text, "field")?;
        let component = component_part
            .map(|text| parse_position(path, text, "component"))
            .transpose()?;

        Ok(Self {
            segment: segment.to_ascii_uppercase(),
            occurrence: occurrence.unwrap_or(0),
            field,
            repetition: repetition.unwrap_or(0),
            component,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segment)?;
        if self.occurrence > 0 {
            write!(f, "[{}]", self.occurrence)?;
        }
        write!(f, "-{}", self.field)?;
        if self.repetition > 0 {
            write!(f, "[{}]", self.repetition)?;
        }
        if let Some(component) = self.component {
            write!(f, ".{component}")?;
        }
        Ok(())
    }
}
