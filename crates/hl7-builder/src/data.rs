//! Builder input
//!
//! Every value is plain text and may be left out. An empty string counts as
//! not supplied, so defaults apply to both.

use serde::{Deserialize, Serialize};

/// Everything needed to build one MDM^T02 message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MdmMessageData {
    pub msh: MshData,
    pub pid: PidData,
    pub txa: TxaData,
    /// PV1 is only emitted when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pv1: Option<Pv1Data>,
    /// One OBX segment per entry
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub obx: Vec<ObxData>,
}

/// Message header values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MshData {
    pub sending_application: String,
    pub sending_facility: String,
    pub receiving_application: String,
    pub receiving_facility: String,
    /// Generated when empty
    pub message_control_id: String,
    /// Defaults to `P`
    pub processing_id: String,
    /// Defaults to `2.5`
    pub version_id: String,
}

/// Patient identification values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PidData {
    pub patient_id: String,
    /// Preferred over `patient_id` for PID-3 when both are given
    pub patient_id_list: String,
    pub patient_name: String,
    pub date_of_birth: String,
    pub sex: String,
    pub address: String,
}

/// Document notification values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TxaData {
    pub document_type: String,
    pub content_presentation: String,
    /// Defaults to the build time
    pub activity_date_time: String,
    pub primary_activity_provider: String,
    pub completion_status: String,
    pub unique_document_number: String,
}

/// Patient visit values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pv1Data {
    pub patient_class: String,
    pub assigned_patient_location: String,
}

/// One observation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObxData {
    pub set_id: String,
    pub value_type: String,
    pub observation_identifier: String,
    pub observation_value: String,
    pub units: String,
}
