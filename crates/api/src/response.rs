//! Shared response envelope types for API handlers.
//!
//! Entity responses use a `{ "data": ... }` envelope; paginated lists add a
//! `pagination` block beside it. The bulk import result is returned bare.

use crm_core::pagination::Pagination;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [T], "pagination": { ... } }` envelope for paginated lists.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
