#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # hl7-builder
//!
//! Builds MDM^T02 documents from flat, form-style input.
//!
//! Input is [`MdmMessageData`], read from JSON or YAML with camelCase keys.
//! The builder maps each value onto its HL7 position, fills the timestamp and
//! message control id when they are not supplied, and hands the result to
//! the generator.
//!
//! ## Example Usage
//!
//! ```rust
//! use hl7_builder::{MdmMessageData, build_mdm};
//!
//! let mut data = MdmMessageData::default();
//! data.msh.sending_application = "EHR".to_string();
//! data.pid.patient_id = "123456".to_string();
//!
//! let doc = build_mdm(&data);
//! assert_eq!(doc.segment("PID").and_then(|pid| pid.field(3)).map(|f| f.first_component()), Some("123456"));
//! ```

pub mod clock;
pub mod data;
pub mod mdm;

pub use clock::{Clock, FixedClock, SystemClock, format_hl7_datetime, generate_message_control_id};
pub use data::{MdmMessageData, MshData, ObxData, PidData, Pv1Data, TxaData};
pub use mdm::{build_mdm, build_mdm_with_clock, generate_mdm, generate_mdm_with_clock};

use thiserror::Error;

/// Errors that can occur while building a message
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to generate message: {0}")]
    Generate(#[from] hl7_codec::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
