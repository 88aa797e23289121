//! Shared helpers for running the `hl7` binary

#![allow(dead_code)]

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

pub const SAMPLE_MDM: &str = "MSH|^~\\&|SendingApp|SendingFac|ReceivingApp|ReceivingFac|20240101120000||MDM^T02^MDM_T02|MSG001|P|2.5\r\
PID|1||123456789^^^MRN^MR||DOE^JOHN^MIDDLE||19800101|M|||123 MAIN ST^^CITY^ST^12345|||(555)123-4567\r\
PV1|1|I|ICU^101^A|||DOC001^SMITH^JANE^MD|||SUR|||||||||V123456789|||A\r\
TXA|1|DOC^Document^HL70019|TEXT^Plain Text^HL70019|20240101120000|DOC001^SMITH^JANE^MD|||20240101120000|||COMP^Complete^HL70272|DOC123456789\r\
OBX|1|TX|NOTE^Clinical Note^L||This is a sample clinical note.|||F\r\
OBX|2|TX|NOTE^Clinical Note^L||Patient is doing well.|||F";

pub fn run_hl7(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hl7"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run hl7")
}

pub fn write_temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("hl7-cli-")
        .suffix(suffix)
        .tempfile()
        .expect("temporary file should be creatable");
    file.write_all(content.as_bytes())
        .expect("temporary file should be writable");
    file
}

pub fn path_arg(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout should be UTF-8")
}

pub fn assert_exit_code(output: &Output, expected: i32) {
    let actual = output.status.code().unwrap_or(-1);
    assert_eq!(
        actual,
        expected,
        "unexpected exit code; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}
