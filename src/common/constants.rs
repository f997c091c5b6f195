/// Service and domain constants shared across the client
/// Field names mirror the tender service's wire format exactly
use crate::common::types::FieldName;

// Tender service
pub const DEFAULT_BASE_URL: &str = "https://citysynergybackend.onrender.com/tender";
pub const TENDERS_PATH: &str = "/tenders";
pub const FILTER_PATH: &str = "/tenders/filter";
pub const CHECK_CLASHES_PATH: &str = "/checkclashes";
pub const DEFAULT_USER_AGENT: &str = concat!("tender_scout/", env!("CARGO_PKG_VERSION"));

// Session limits
pub const PAGE_SIZE: usize = 10;
pub const MAX_FILTER_COLUMNS: usize = 5;

/// Value of `Cancel_Accept_Tenders` for tenders that went ahead
pub const ACCEPTED_STATUS: &str = "Accepted";

// User-facing messages
pub const MSG_ALL_FIELDS_REQUIRED: &str = "all fields required";
pub const MSG_PINCODE_REQUIRED: &str = "pincode is required";
pub const MSG_AREA_NEEDS_PINCODE: &str = "select a pincode before choosing an area";
pub const MSG_LOCAL_AREA_NEEDS_AREA: &str = "select an area before choosing a local area";
pub const MSG_LOAD_FAILED: &str = "Failed to load tenders";
pub const MSG_FILTER_FAILED: &str = "Search and filter failed";
pub const MSG_SEARCH_FAILED: &str = "Search failed";
pub const MSG_CLASHES_FAILED: &str = "Failed to check clashes";
pub const MSG_AREA_OPTIONS_FAILED: &str = "Failed to load areas";
pub const MSG_LOCAL_AREA_OPTIONS_FAILED: &str = "Failed to load local areas";

/// Fields a free-text search can target
pub const SEARCHABLE_FIELDS: [FieldName; 5] = [
    FieldName::TenderId,
    FieldName::Location,
    FieldName::Department,
    FieldName::Classification,
    FieldName::TenderStatus,
];

/// Columns offered in the filter palette
pub const FILTERABLE_COLUMNS: [FieldName; 16] = [
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
];

/// Columns shown in the tender table when no filter columns are selected
pub const DEFAULT_TABLE_COLUMNS: [FieldName; 5] = SEARCHABLE_FIELDS;

pub const CLASH_TABLE_COLUMNS: [FieldName; 5] = [
    FieldName::TenderId,
    FieldName::Pincode,
    FieldName::SanctionDate,
    FieldName::CompletionDate,
    FieldName::Priorities,
];
