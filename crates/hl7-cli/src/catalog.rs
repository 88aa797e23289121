//! Display names for well-known segments and fields

/// Field names by segment, sorted by position
static CATALOG: &[(&str, &str, &[(u32, &str)])] = &[
    (
        "MSH",
        "Message Header",
        &[
            (1, "Field Separator"),
            (2, "Encoding Characters"),
            (3, "Sending Application"),
            (4, "Sending Facility"),
            (5, "Receiving Application"),
            (6, "Receiving Facility"),
            (7, "Date/Time of Message"),
            (9, "Message Type"),
            (10, "Message Control ID"),
            (11, "Processing ID"),
            (12, "Version ID"),
        ],
    ),
    (
        "PID",
        "Patient Identification",
        &[
            (3, "Patient Identifier List"),
            (5, "Patient Name"),
            (7, "Date/Time of Birth"),
            (8, "Administrative Sex"),
            (11, "Patient Address"),
        ],
    ),
    (
        "PV1",
        "Patient Visit",
        &[(2, "Patient Class"), (3, "Assigned Patient Location")],
    ),
    (
        "TXA",
        "Transcription Document Header",
        &[
            (2, "Document Type"),
            (3, "Content Presentation"),
            (4, "Activity Date/Time"),
            (5, "Primary Activity Provider"),
            (12, "Completion Status"),
            (16, "Unique Document Number"),
        ],
    ),
    (
        "OBX",
        "Observation/Result",
        &[
            (1, "Set ID"),
            (2, "Value Type"),
            (3, "Observation Identifier"),
            (5, "Observation Value"),
            (6, "Units"),
        ],
    ),
];

/// Descriptive name of a segment, if known
pub fn segment_name(segment: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|(name, _, _)| *name == segment)
        .map(|(_, description, _)| *description)
}

/// Display name of a field; `Field N` when not catalogued
pub fn field_name(segment: &str, position: u32) -> String {
    CATALOG
        .iter()
        .find(|(name, _, _)| *name == segment)
        .and_then(|(_, _, fields)| {
            fields
                .binary_search_by_key(&position, |(p, _)| *p)
                .ok()
                .map(|i| fields[i].1)
        })
        .map_or_else(|| format!("Field {position}"), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        assert_eq!(field_name("MSH", 9), "Message Type");
        assert_eq!(field_name("TXA", 16), "Unique Document Number");
        assert_eq!(segment_name("OBX"), Some("Observation/Result"));
    }

    #[test]
    fn test_unknown_fields_fall_back() {
        assert_eq!(field_name("MSH", 8), "Field 8");
        assert_eq!(field_name("ZZZ", 1), "Field 1");
        assert_eq!(segment_name("ZZZ"), None);
    }

    #[test]
    fn test_tables_sorted_by_position() {
        for (_, _, fields) in CATALOG {
            assert!(fields.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }
}
