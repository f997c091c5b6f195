use crate::common::error::{Result, TenderError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Field names of the tender service's record format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldName {
    #[serde(rename = "Tender_ID")]
    TenderId,
    #[serde(rename = "Tender_By_Location")]
    Location,
    #[serde(rename = "Tender_By_Department")]
    Department,
    #[serde(rename = "Tender_By_Classification")]
    Classification,
    #[serde(rename = "Sanction_Date")]
    SanctionDate,
    #[serde(rename = "Completion_Date")]
    CompletionDate,
    #[serde(rename = "Sanction_Amount")]
    SanctionAmount,
    #[serde(rename = "Total_Duration_Days")]
    TotalDurationDays,
    #[serde(rename = "Priorities")]
    Priorities,
    #[serde(rename = "Cancel_Accept_Tenders")]
    CancelAcceptTenders,
    #[serde(rename = "Reason_for_Decision")]
    ReasonForDecision,
    #[serde(rename = "Tender_Status")]
    TenderStatus,
    #[serde(rename = "Reason_for_Status")]
    ReasonForStatus,
    #[serde(rename = "Completed_Pending")]
    CompletedPending,
    #[serde(rename = "Tender_Acquired_By_Agency")]
    AcquiredByAgency,
    #[serde(rename = "pincode")]
    Pincode,
    #[serde(rename = "area_name")]
    AreaName,
    #[serde(rename = "local_area_name")]
    LocalAreaName,
}

impl FieldName {
    pub const ALL: [FieldName; 18] = [
        FieldName::TenderId,
        FieldName::Location,
        FieldName::Department,
        FieldName::Classification,
        FieldName::SanctionDate,
        FieldName::CompletionDate,
        FieldName::SanctionAmount,
        FieldName::TotalDurationDays,
        FieldName::Priorities,
        FieldName::CancelAcceptTenders,
        FieldName::ReasonForDecision,
        FieldName::TenderStatus,
        FieldName::ReasonForStatus,
        FieldName::CompletedPending,
        FieldName::AcquiredByAgency,
        FieldName::Pincode,
        FieldName::AreaName,
        FieldName::LocalAreaName,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::TenderId => "Tender_ID",
            FieldName::Location => "Tender_By_Location",
            FieldName::Department => "Tender_By_Department",
            FieldName::Classification => "Tender_By_Classification",
            FieldName::SanctionDate => "Sanction_Date",
            FieldName::CompletionDate => "Completion_Date",
            FieldName::SanctionAmount => "Sanction_Amount",
            FieldName::TotalDurationDays => "Total_Duration_Days",
            FieldName::Priorities => "Priorities",
            FieldName::CancelAcceptTenders => "Cancel_Accept_Tenders",
            FieldName::ReasonForDecision => "Reason_for_Decision",
            FieldName::TenderStatus => "Tender_Status",
            FieldName::ReasonForStatus => "Reason_for_Status",
            FieldName::CompletedPending => "Completed_Pending",
            FieldName::AcquiredByAgency => "Tender_Acquired_By_Agency",
            FieldName::Pincode => "pincode",
            FieldName::AreaName => "area_name",
            FieldName::LocalAreaName => "local_area_name",
        }
    }

    /// Column heading: the wire name with underscores shown as spaces
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn is_date(&self) -> bool {
        matches!(self, FieldName::SanctionDate | FieldName::CompletionDate)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = TenderError;

    fn from_str(s: &str) -> Result<Self> {
        FieldName::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| TenderError::validation(format!("unknown field name: {}", s)))
    }
}

/// One entry of a dependent dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self { label: value.clone(), value }
    }
}

/// A tender as returned by the service. Fields are kept verbatim so that
/// anything the client does not interpret round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenderRecord(Map<String, Value>);

impl TenderRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: FieldName) -> Option<&Value> {
        self.0.get(field.as_str())
    }

    /// Field rendered as plain text; strings are taken as-is, numbers and
    /// booleans are stringified, null and missing fields yield `None`.
    pub fn text(&self, field: FieldName) -> Option<String> {
        value_text(self.get(field)?)
    }

    pub fn field_equals(&self, field: FieldName, expected: &str) -> bool {
        self.text(field).as_deref() == Some(expected)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Body of `POST /tenders/filter`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub search_by: String,
    pub search_term: String,
    pub filter_columns: Vec<FieldName>,
}

impl FilterRequest {
    /// Server-side narrowing to a single postal code
    pub fn by_pincode(pincode: &str) -> Self {
        Self {
            search_by: FieldName::Pincode.as_str().to_string(),
            search_term: pincode.to_string(),
            filter_columns: Vec::new(),
        }
    }
}

/// Body of `POST /checkclashes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashRequest {
    pub pincode: String,
}

/// Clash priority; any label outside High/Medium/Low is kept as unrecognized
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
    Unrecognized(String),
}

impl Priority {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Unrecognized(label.to_string()),
        }
    }

    /// Position in the arbitration order; unrecognized labels rank after Low
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Unrecognized(_) => 4,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => f.write_str("High"),
            Priority::Medium => f.write_str("Medium"),
            Priority::Low => f.write_str("Low"),
            Priority::Unrecognized(label) => f.write_str(label),
        }
    }
}

/// A tender involved in a clash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClashEntry {
    #[serde(rename = "Tender_ID", default)]
    pub id: Value,
    #[serde(rename = "pincode", default)]
    pub postal_code: Value,
    #[serde(rename = "Sanction_Date", default, skip_serializing_if = "Value::is_null")]
    pub sanction_date: Value,
    #[serde(rename = "Completion_Date", default, skip_serializing_if = "Value::is_null")]
    pub completion_date: Value,
    /// Kept raw; labels that are not strings rank as unrecognized
    #[serde(rename = "Priorities", default, skip_serializing_if = "Value::is_null")]
    pub priority_label: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClashEntry {
    pub fn priority(&self) -> Priority {
        match &self.priority_label {
            Value::String(label) => Priority::parse(label),
            other => Priority::Unrecognized(value_text(other).unwrap_or_default()),
        }
    }
}

/// Response of `POST /checkclashes`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClashResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clashes: Option<Vec<ClashEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
