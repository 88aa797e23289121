//! MDM^T02 message assembly

use crate::Result;
use crate::clock::{Clock, SystemClock, format_hl7_datetime, generate_message_control_id};
use crate::data::{MdmMessageData, MshData, ObxData, PidData, Pv1Data, TxaData};
use hl7_codec::Hl7Generator;
use hl7_model::{Document, Field, Segment};
use tracing::debug;

const DEFAULT_PROCESSING_ID: &str = "P";
const DEFAULT_VERSION_ID: &str = "2.5";

/// Build a document using the system clock
pub fn build_mdm(data: &MdmMessageData) -> Document {
    build_mdm_with_clock(data, &SystemClock)
}

/// Build a document, taking the timestamp and control id from `clock`
pub fn build_mdm_with_clock(data: &MdmMessageData, clock: &dyn Clock) -> Document {
    let timestamp = format_hl7_datetime(&clock.now());
    let control_id = if data.msh.message_control_id.is_empty() {
        generate_message_control_id(clock)
    } else {
        data.msh.message_control_id.clone()
    };

    let mut doc = Document::new()
        .with_segment("MSH", msh(&data.msh, &timestamp, control_id))
        .with_segment("PID", pid(&data.pid))
        .with_segment("TXA", txa(&data.txa, &timestamp));

    if let Some(visit) = &data.pv1 {
        doc.push_segment("PV1", pv1(visit));
    }
    for observation in &data.obx {
        doc.push_segment("OBX", obx(observation));
    }

    debug!(
        segments = doc.len(),
        observations = data.obx.len(),
        "Built MDM^T02 document"
    );
    doc
}

/// Build and generate a message using the system clock
///
/// # Errors
///
/// Returns an error if the generator rejects the built document.
pub fn generate_mdm(data: &MdmMessageData) -> Result<String> {
    generate_mdm_with_clock(data, &SystemClock)
}

/// Build and generate a message, taking generated values from `clock`
///
/// # Errors
///
/// Returns an error if the generator rejects the built document.
pub fn generate_mdm_with_clock(data: &MdmMessageData, clock: &dyn Clock) -> Result<String> {
    let doc = build_mdm_with_clock(data, clock);
    Ok(Hl7Generator::new().generate(&doc)?)
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

/// `{1: value}`, or an empty field when there is no value
fn first_component(value: &str) -> Field {
    if value.is_empty() {
        Field::empty()
    } else {
        Field::component_at(1, value)
    }
}

fn msh(data: &MshData, timestamp: &str, control_id: String) -> Segment {
    Segment::new()
        .with_field(1, "|")
        .with_field(2, "^~\\&")
        .with_field(3, data.sending_application.as_str())
        .with_field(4, data.sending_facility.as_str())
        .with_field(5, data.receiving_application.as_str())
        .with_field(6, data.receiving_facility.as_str())
        .with_field(7, Field::component_at(1, timestamp))
        .with_field(9, Field::from_components(["MDM", "T02"]))
        .with_field(10, control_id)
        .with_field(11, or_default(&data.processing_id, DEFAULT_PROCESSING_ID))
        .with_field(
            12,
            Field::component_at(1, or_default(&data.version_id, DEFAULT_VERSION_ID)),
        )
}

fn pid(data: &PidData) -> Segment {
    let identifier = or_default(&data.patient_id_list, &data.patient_id);
    Segment::new()
        .with_field(3, first_component(identifier))
        .with_field(5, first_component(&data.patient_name))
        .with_field(7, data.date_of_birth.as_str())
        .with_field(8, data.sex.as_str())
        .with_field(11, first_component(&data.address))
}

fn txa(data: &TxaData, timestamp: &str) -> Segment {
    Segment::new()
        .with_field(2, data.document_type.as_str())
        .with_field(3, data.content_presentation.as_str())
        .with_field(4, or_default(&data.activity_date_time, timestamp))
        .with_field(5, first_component(&data.primary_activity_provider))
        .with_field(12, data.completion_status.as_str())
        .with_field(16, data.unique_document_number.as_str())
}

fn pv1(data: &Pv1Data) -> Segment {
    Segment::new()
        .with_field(2, data.patient_class.as_str())
        .with_field(3, first_component(&data.assigned_patient_location))
}

fn obx(data: &ObxData) -> Segment {
    Segment::new()
        .with_field(1, data.set_id.as_str())
        .with_field(2, data.value_type.as_str())
        .with_field(3, first_component(&data.observation_identifier))
        .with_field(5, data.observation_value.as_str())
        .with_field(6, first_component(&data.units))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{DateTime, Local, TimeZone};

    fn at() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
            .earliest()
            .unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock::new(at(), 7)
    }

    fn value(doc: &Document, segment: &str, position: u32) -> String {
        doc.segment(segment)
            .and_then(|s| s.field(position))
            .map(|f| f.first_component().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_defaults_fill_header() {
        let doc = build_mdm_with_clock(&MdmMessageData::default(), &clock());

        let msh = doc.segment("MSH").unwrap();
        assert_eq!(msh.field(7), Some(&Field::component_at(1, "20240101120000")));
        assert_eq!(msh.field(9), Some(&Field::from_components(["MDM", "T02"])));
        assert_eq!(msh.field(11), Some(&Field::simple("P")));
        assert_eq!(msh.field(12), Some(&Field::component_at(1, "2.5")));
        assert_eq!(
            value(&doc, "MSH", 10),
            format!("MSG{}7", at().timestamp_millis())
        );
        assert_eq!(value(&doc, "TXA", 4), "20240101120000");
        assert!(!doc.contains("PV1"));
        assert!(!doc.contains("OBX"));
    }

    #[test]
    fn test_supplied_values_win() {
        let mut data = MdmMessageData::default();
        data.msh.message_control_id = "CTRL1".to_string();
        data.msh.processing_id = "T".to_string();
        data.msh.version_id = "2.6".to_string();
        data.txa.activity_date_time = "20230615083000".to_string();

        let doc = build_mdm_with_clock(&data, &clock());
        assert_eq!(value(&doc, "MSH", 10), "CTRL1");
        assert_eq!(value(&doc, "MSH", 11), "T");
        assert_eq!(value(&doc, "MSH", 12), "2.6");
        assert_eq!(value(&doc, "TXA", 4), "20230615083000");
    }

    #[test]
    fn test_patient_identifier_preference() {
        let mut data = MdmMessageData::default();
        data.pid.patient_id = "ID".to_string();
        let doc = build_mdm_with_clock(&data, &clock());
        assert_eq!(
            doc.segment("PID").unwrap().field(3),
            Some(&Field::component_at(1, "ID"))
        );

        data.pid.patient_id_list = "LIST".to_string();
        let doc = build_mdm_with_clock(&data, &clock());
        assert_eq!(value(&doc, "PID", 3), "LIST");

        let doc = build_mdm_with_clock(&MdmMessageData::default(), &clock());
        assert_eq!(doc.segment("PID").unwrap().field(3), Some(&Field::empty()));
    }

    #[test]
    fn test_optional_segments() {
        let mut data = MdmMessageData::default();
        data.pv1 = Some(Pv1Data {
            patient_class: "I".to_string(),
            assigned_patient_location: "ICU".to_string(),
        });
        data.obx = vec![
            ObxData {
                set_id: "1".to_string(),
                value_type: "TX".to_string(),
                observation_value: "first".to_string(),
                ..ObxData::default()
            },
            ObxData {
                set_id: "2".to_string(),
                units: "mg".to_string(),
                ..ObxData::default()
            },
        ];

        let doc = build_mdm_with_clock(&data, &clock());
        assert_eq!(value(&doc, "PV1", 2), "I");
        assert_eq!(value(&doc, "PV1", 3), "ICU");

        let observations = doc.occurrences("OBX");
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].field(5), Some(&Field::simple("first")));
        assert_eq!(observations[1].field(6), Some(&Field::component_at(1, "mg")));
    }

    #[test]
    fn test_generate_text() {
        let mut data = MdmMessageData::default();
        data.msh.sending_application = "EHR".to_string();
        data.msh.message_control_id = "CTRL1".to_string();
        data.pid.patient_id = "123".to_string();
        data.txa.document_type = "DS".to_string();
        data.obx = vec![ObxData {
            set_id: "1".to_string(),
            observation_value: "note".to_string(),
            ..ObxData::default()
        }];

        let text = generate_mdm_with_clock(&data, &clock()).unwrap();
        let lines: Vec<&str> = text.split('\r').collect();
        assert_eq!(
            lines,
            vec![
                "MSH|^~\\&|EHR||||20240101120000||MDM^T02|CTRL1|P|2.5",
                "PID|||123||||||||",
                "TXA||DS||20240101120000||||||||||||",
                "OBX|1||||note|",
            ]
        );
    }
}
