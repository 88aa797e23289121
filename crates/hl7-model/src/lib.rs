#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # hl7-model
//!
//! Field, segment, and document structures for HL7 v2 messages.
//!
//! A [`Document`] maps segment names to one or more [`Segment`]s, each of
//! which is a sparse, 1-based map of [`Field`]s. Fields are either simple
//! text, component-structured, or repeated. Nothing in this crate knows about
//! delimiters; encoding and decoding live in `hl7-codec`.

/// Document container with single/sequence segment entries.
pub mod document;
/// Recursive field value representation.
pub mod field;
/// Gap-filling iteration over sparse 1-based maps.
pub mod index;
/// Textual field addresses such as `PID-3.1` or `OBX[1]-5`.
pub mod path;
/// Sparse, 1-based field map for a single segment occurrence.
pub mod segment;
/// Visitor-based walking of a document.
pub mod traversal;

pub use document::{Document, SegmentEntry};
pub use field::{Components, Field};
pub use index::{Dense, dense};
pub use path::FieldPath;
pub use segment::Segment;
pub use traversal::{Visitor, walk};

use thiserror::Error;

/// Errors that can occur when working with the model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl Error {
    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
