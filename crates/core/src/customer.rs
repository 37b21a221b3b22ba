//! Customer status values, the insert payload, and field rules shared by the
//! JSON API and the spreadsheet importer.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a customer record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    Active,
    Inactive,
    Lead,
}

impl CustomerStatus {
    /// Return the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Lead => "lead",
        }
    }

    /// Parse a status string. Returns `None` for unknown values.
    ///
    /// Matching is exact: `"Active"` is not a valid status.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "lead" => Some(Self::Lead),
            _ => None,
        }
    }

    /// All valid status values.
    pub const ALL: &'static [&'static str] = &["active", "inactive", "lead"];
}

impl TryFrom<String> for CustomerStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
            .ok_or_else(|| CoreError::Internal(format!("Unknown stored customer status '{value}'")))
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Insert payload
// ---------------------------------------------------------------------------

/// A fully validated customer ready to be inserted.
///
/// Required fields are non-empty; optional fields are `None` rather than `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub account_number: String,
    pub phone: String,
    pub nominee: Option<String>,
    pub nid: Option<String>,
    pub notes: Option<String>,
    pub status: CustomerStatus,
    /// The authenticated user who created the record, if any.
    pub created_by: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Validate a required text field: trimmed, must not be empty.
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, CoreError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

/// Normalize an optional text field: trimmed, and empty becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Status for a new record: an absent, blank or unknown value becomes
/// [`CustomerStatus::Active`].
pub fn status_or_default(value: Option<&str>) -> CustomerStatus {
    value
        .map(str::trim)
        .and_then(CustomerStatus::from_str)
        .unwrap_or_default()
}

/// Parse an optional status change supplied through the JSON API.
///
/// An absent or blank value yields `None`; an unknown value is a validation
/// error.
pub fn parse_status(value: Option<&str>) -> Result<Option<CustomerStatus>, CoreError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => CustomerStatus::from_str(v).map(Some).ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid status '{v}'. Expected one of: {}",
                CustomerStatus::ALL.join(", ")
            ))
        }),
    }
}
