//! HL7 v2 syntax definitions and delimiter handling
//!
//! The MSH segment declares the delimiters for the whole message: the
//! character right after `MSH` is the field separator, and the encoding
//! characters that follow give the component, repetition, escape, and
//! sub-component delimiters in that order.

/// Default HL7 delimiters (canonical set used for generation)
pub const DEFAULT_FIELD_SEPARATOR: char = '|';
pub const DEFAULT_COMPONENT_SEPARATOR: char = '^';
pub const DEFAULT_REPETITION_SEPARATOR: char = '~';
pub const DEFAULT_ESCAPE_CHARACTER: char = '\\';
pub const DEFAULT_SUBCOMPONENT_SEPARATOR: char = '&';

/// Header segment tag that must open every message
pub const HEADER_TAG: &str = "MSH";

/// Shortest line that can hold a segment: three-character name plus separator
pub const MIN_SEGMENT_LENGTH: usize = 4;

/// Delimiters used for parsing HL7
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Field separator (default '|')
    pub field: char,
    /// Component separator (default '^')
    pub component: char,
    /// Repetition separator (default '~')
    pub repetition: char,
    /// Escape character (default '\'); recognised but not applied
    pub escape: char,
    /// Sub-component separator (default '&')
    pub subcomponent: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            field: DEFAULT_FIELD_SEPARATOR,
            component: DEFAULT_COMPONENT_SEPARATOR,
            repetition: DEFAULT_REPETITION_SEPARATOR,
            escape: DEFAULT_ESCAPE_CHARACTER,
            subcomponent: DEFAULT_SUBCOMPONENT_SEPARATOR,
        }
    }
}

impl Delimiters {
    /// Read delimiters from an MSH line
    ///
    /// MSH format: `MSH|^~\&|...`
    /// Positions:   0123 4567
    ///
    /// Anything missing falls back to the default for that position. The
    /// encoding block ends early at the field separator, so `MSH|^~|` keeps
    /// the default escape and sub-component characters.
    pub fn from_header(header: &str) -> Self {
        let defaults = Self::default();
        let mut chars = header.chars().skip(HEADER_TAG.len());

        let field = chars.next().unwrap_or(defaults.field);
        let mut encoding = chars.take_while(|c| *c != field).take(4);

        Self {
            field,
            component: encoding.next().unwrap_or(defaults.component),
            repetition: encoding.next().unwrap_or(defaults.repetition),
            escape: encoding.next().unwrap_or(defaults.escape),
            subcomponent: encoding.next().unwrap_or(defaults.subcomponent),
        }
    }

    /// The MSH-2 encoding characters block for these delimiters
    pub fn encoding_characters(&self) -> String {
        [self.component, self.repetition, self.escape, self.subcomponent]
            .iter()
            .collect()
    }

    /// Check if a character is a structural delimiter
    pub fn is_delimiter(&self, c: char) -> bool {
        c == self.field || c == self.component || c == self.repetition || c == self.subcomponent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delimiters() {
        let delimiters = Delimiters::default();
        assert_eq!(delimiters.field, '|');
        assert_eq!(delimiters.component, '^');
        assert_eq!(delimiters.repetition, '~');
        assert_eq!(delimiters.escape, '\\');
        assert_eq!(delimiters.subcomponent, '&');
        assert_eq!(delimiters.encoding_characters(), "^~\\&");
    }

    #[test]
    fn test_standard_header() {
        let delimiters = Delimiters::from_header("MSH|^~\\&|SendingApp|SendingFac");
        assert_eq!(delimiters, Delimiters::default());
    }

    #[test]
    fn test_custom_header() {
        let delimiters = Delimiters::from_header("MSH#*@!%#APP");
        assert_eq!(delimiters.field, '#');
        assert_eq!(delimiters.component, '*');
        assert_eq!(delimiters.repetition, '@');
        assert_eq!(delimiters.escape, '!');
        assert_eq!(delimiters.subcomponent, '%');
    }

    #[test]
    fn test_bare_header_uses_defaults() {
        assert_eq!(Delimiters::from_header("MSH"), Delimiters::default());
    }

    #[test]
    fn test_short_encoding_block_stops_at_field_separator() {
        let delimiters = Delimiters::from_header("MSH|*@|APP");
        assert_eq!(delimiters.field, '|');
        assert_eq!(delimiters.component, '*');
        assert_eq!(delimiters.repetition, '@');
        assert_eq!(delimiters.escape, '\\');
        assert_eq!(delimiters.subcomponent, '&');
    }

    #[test]
    fn test_is_delimiter() {
        let delimiters = Delimiters::default();
        for c in ['|', '^', '~', '&'] {
            assert!(delimiters.is_delimiter(c), "'{c}' should be a delimiter");
        }
        assert!(!delimiters.is_delimiter('\\'));
        assert!(!delimiters.is_delimiter('A'));
    }
}
