//! Time and randomness sources for generated values

use chrono::{DateTime, Local, TimeZone};
use rand::Rng;
use std::fmt;

/// HL7 `TS` layout at second precision
const HL7_DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Source of the current instant and of control-id randomness
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> DateTime<Local>;

    /// Random suffix for message control ids, in `0..=9999`
    fn random_suffix(&self) -> u32;
}

/// Wall clock with a thread-local random generator
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn random_suffix(&self) -> u32 {
        rand::rng().random_range(0..=9999)
    }
}

/// A clock stopped at one instant, with a fixed suffix
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub at: DateTime<Local>,
    pub suffix: u32,
}

impl FixedClock {
    pub fn new(at: DateTime<Local>, suffix: u32) -> Self {
        Self { at, suffix }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.at
    }

    fn random_suffix(&self) -> u32 {
        self.suffix
    }
}

/// Format a timestamp as `YYYYMMDDHHMMSS` in its own time zone
pub fn format_hl7_datetime<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.format(HL7_DATETIME_FORMAT).to_string()
}

/// `MSG` followed by the epoch milliseconds and a random suffix
pub fn generate_message_control_id(clock: &dyn Clock) -> String {
    format!(
        "MSG{}{}",
        clock.now().timestamp_millis(),
        clock.random_suffix()
    )
}
