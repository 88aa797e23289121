#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # hl7-codec
//!
//! HL7 v2 pipe-delimited parser and generator.
//!
//! The parser reads the delimiters declared by the message's own MSH segment
//! and builds an `hl7_model::Document`; the generator writes a document back
//! out using the canonical delimiters `|^~\&`.

pub mod generator;
pub mod parser;
pub mod syntax;

pub use generator::{Hl7Generator, SegmentOrder};
pub use parser::{Hl7Parser, ParseLimits, ParseOutcome, ParseReport, ParseWarning, message_type};
pub use syntax::Delimiters;

use hl7_model::Document;
use thiserror::Error;

/// Errors that can occur when parsing/generating HL7
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Message is empty")]
    EmptyInput,

    #[error("Message must start with MSH segment")]
    MissingHeader,

    #[error("Document has no segments to generate")]
    EmptyDocument,

    #[error("Position {position} in segment {segment} exceeds the maximum of {max}")]
    PositionOutOfRange {
        segment: String,
        position: u32,
        max: u32,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parse a message with default limits
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] or [`Error::MissingHeader`] when no document
/// can be produced.
pub fn parse(text: &str) -> Result<ParseOutcome> {
    Hl7Parser::new().parse(text)
}

/// Generate a message using the default MDM^T02 segment order
///
/// # Errors
///
/// Returns an error when the document is empty or holds an out-of-range position.
pub fn generate(doc: &Document) -> Result<String> {
    Hl7Generator::new().generate(doc)
}
