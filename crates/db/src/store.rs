//! PostgreSQL-backed sink for the bulk import pipeline.

use async_trait::async_trait;
use crm_core::customer::NewCustomer;
use crm_core::import::{CustomerSink, InsertError};

use crate::models::customer::Customer;
use crate::repositories::customer_repo::ACCOUNT_NUMBER_CONSTRAINT;
use crate::repositories::CustomerRepo;
use crate::{is_unique_violation, DbPool};

/// Inserts imported customers through [`CustomerRepo::create`].
///
/// Each insert is its own statement, so a failed row never leaves a
/// partial record and never rolls back earlier rows.
#[derive(Debug, Clone)]
pub struct PgCustomerStore {
    pool: DbPool,
}

impl PgCustomerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerSink for PgCustomerStore {
    type Record = Customer;

    async fn insert(&self, customer: &NewCustomer) -> Result<Customer, InsertError> {
        CustomerRepo::create(&self.pool, customer)
            .await
            .map_err(classify_insert_error)
    }
}

/// Map a failed insert onto the pipeline's error kinds.
fn classify_insert_error(err: sqlx::Error) -> InsertError {
    if is_unique_violation(&err, ACCOUNT_NUMBER_CONSTRAINT) {
        return InsertError::DuplicateAccountNumber;
    }
    tracing::warn!(error = %err, "Customer insert failed");
    match err {
        sqlx::Error::Database(db_err) => InsertError::Store(db_err.message().to_string()),
        other => InsertError::Store(other.to_string()),
    }
}
