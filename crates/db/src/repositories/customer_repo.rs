//! Repository for the `customers` table.

use crm_core::customer::NewCustomer;
use crm_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer::{Customer, UpdateCustomer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, account_number, phone, nominee, nid, notes, status, \
                       created_by, created_at, updated_at";

/// Search predicate shared by `list` and `count`. `$1` is a `%term%` pattern
/// or NULL for no filter.
const SEARCH_FILTER: &str = "($1::text IS NULL
                               OR name ILIKE $1
                               OR account_number ILIKE $1
                               OR phone ILIKE $1
                               OR nominee ILIKE $1
                               OR nid ILIKE $1)";

/// Unique constraint guarding `account_number`.
pub const ACCOUNT_NUMBER_CONSTRAINT: &str = "uq_customers_account_number";

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewCustomer) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers
                (name, account_number, phone, nominee, nid, notes, status, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&input.name)
            .bind(&input.account_number)
            .bind(&input.phone)
            .bind(&input.nominee)
            .bind(&input.nid)
            .bind(&input.notes)
            .bind(input.status.as_str())
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a customer by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of customers, newest first, optionally filtered by a
    /// case-insensitive substring match.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Customer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customers
             WHERE {SEARCH_FILTER}
             ORDER BY created_at DESC, id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(search.map(search_pattern))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count customers matching the same filter as [`CustomerRepo::list`].
    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM customers WHERE {SEARCH_FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(search.map(search_pattern))
            .fetch_one(pool)
            .await
    }

    /// Update a customer.
    ///
    /// Required fields and status are only changed when provided; `nominee`,
    /// `nid` and `notes` are always overwritten. Returns `None` if no row with
    /// the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET
                name = COALESCE($2, name),
                account_number = COALESCE($3, account_number),
                phone = COALESCE($4, phone),
                status = COALESCE($5, status),
                nominee = $6,
                nid = $7,
                notes = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.account_number)
            .bind(&input.phone)
            .bind(input.status.map(|s| s.as_str()))
            .bind(&input.nominee)
            .bind(&input.nid)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a customer. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Wrap a search term for `ILIKE`, escaping its wildcards so they match
/// literally.
fn search_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
