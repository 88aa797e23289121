//! Integration tests: parsed messages validated against the MDM^T02 profile

use hl7_codec::parse;
use hl7_validation::{ValidationEngine, should_validate_as_mdm, validate};

const SAMPLE_MDM: &str = "MSH|^~\\&|SendingApp|SendingFac|ReceivingApp|ReceivingFac|20240101120000||MDM^T02^MDM_T02|MSG001|P|2.5\r\
PID|1||123456789^^^MRN^MR||DOE^JOHN^MIDDLE||19800101|M|||123 MAIN ST^^CITY^ST^12345|||(555)123-4567\r\
PV1|1|I|ICU^101^A|||DOC001^SMITH^JANE^MD|||SUR|||||||||V123456789|||A\r\
TXA|1|DOC^Document^HL70019|TEXT^Plain Text^HL70019|20240101120000|DOC001^SMITH^JANE^MD|||20240101120000|||COMP^Complete^HL70272|DOC123456789\r\
OBX|1|TX|NOTE^Clinical Note^L||This is a sample clinical note.|||F\r\
OBX|2|TX|NOTE^Clinical Note^L||Patient is doing well.|||F";

#[test]
fn sample_message_is_valid() -> anyhow::Result<()> {
    let outcome = parse(SAMPLE_MDM)?;
    assert!(should_validate_as_mdm(outcome.message_type.as_deref()));
    assert_eq!(outcome.document.occurrences("OBX").len(), 2);

    let report = validate(&outcome.document);
    assert!(report.valid, "unexpected errors: {:?}", report.errors);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
    Ok(())
}

#[test]
fn missing_pid_is_single_structural_error() -> anyhow::Result<()> {
    let without_pid: String = SAMPLE_MDM
        .split('\r')
        .filter(|line| !line.starts_with("PID"))
        .collect::<Vec<_>>()
        .join("\r");
    let outcome = parse(&without_pid)?;

    let report = validate(&outcome.document);
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("PID"));
    Ok(())
}

#[test]
fn related_message_type_passes_with_warnings() -> anyhow::Result<()> {
    let text = SAMPLE_MDM.replacen("MDM^T02^MDM_T02", "MDM^T04", 1);
    let outcome = parse(&text)?;
    assert_eq!(outcome.message_type.as_deref(), Some("MDM^T04"));

    let result = ValidationEngine::new().validate(&outcome.document);
    assert!(result.is_valid);
    let codes: Vec<&str> = result.warnings.iter().map(|w| w.code.as_str()).collect();
    assert_eq!(codes, vec!["TRIGGER_EVENT_MISMATCH"]);
    Ok(())
}

#[test]
fn sparse_txa_produces_recommendations() -> anyhow::Result<()> {
    let text = "MSH|^~\\&|APP|FAC|||20240101||MDM^T02|1|P|2.5\rPID|1||^^^MRN\rTXA|1";
    let outcome = parse(text)?;

    let report = validate(&outcome.document);
    assert!(report.valid);
    assert_eq!(report.warnings.len(), 4);
    assert!(report.warnings[0].starts_with("PID-3"));
    Ok(())
}
