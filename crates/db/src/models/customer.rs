//! Customer entity model and DTOs.

use crm_core::customer::CustomerStatus;
use crm_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub name: String,
    pub account_number: String,
    pub phone: String,
    pub nominee: Option<String>,
    pub nid: Option<String>,
    pub notes: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: CustomerStatus,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated changes for an existing customer.
///
/// `None` leaves the required fields and status untouched. The optional
/// text fields are always written, so `None` clears them.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub account_number: Option<String>,
    pub phone: Option<String>,
    pub status: Option<CustomerStatus>,
    pub nominee: Option<String>,
    pub nid: Option<String>,
    pub notes: Option<String>,
}
