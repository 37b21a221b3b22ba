//! The persistence seam of the import pipeline.

use async_trait::async_trait;

use crate::customer::NewCustomer;

/// Why a single insert was rejected by the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsertError {
    /// The account number is already taken by another customer.
    #[error("account number already exists")]
    DuplicateAccountNumber,

    /// Any other store rejection, carrying the store's message.
    #[error("{0}")]
    Store(String),
}

/// A customer store that accepts one insert at a time.
///
/// Implementations must apply each insert atomically: a rejected insert
/// leaves no partial record behind.
#[async_trait]
pub trait CustomerSink: Send + Sync {
    /// The stored representation returned on success.
    type Record: Send;

    async fn insert(&self, customer: &NewCustomer) -> Result<Self::Record, InsertError>;
}
