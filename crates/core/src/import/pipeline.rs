//! Import driver: intake, decode, then one insert per row in input order.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::decoder::{decode_rows, ImportRow};
use super::error::ImportError;
use super::intake::{check_upload, UploadedFile, DEFAULT_MAX_UPLOAD_BYTES};
use super::normalizer::normalize_row;
use super::report::{ImportResult, RowError};
use super::sink::{CustomerSink, InsertError};
use crate::customer::NewCustomer;
use crate::types::DbId;

/// Default cap on decoded rows per import.
pub const DEFAULT_MAX_ROWS: usize = 10_000;

/// Default wall-clock budget for the row loop.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(25);

const CANCELLED: &str = "Import cancelled before this row was processed";
const TIMED_OUT: &str = "Import time limit exceeded before this row was processed";

/// Resource bounds for one import.
#[derive(Debug, Clone)]
pub struct ImportLimits {
    pub max_upload_bytes: usize,
    pub max_rows: usize,
    /// `None` disables the wall-clock budget.
    pub time_limit: Option<Duration>,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_rows: DEFAULT_MAX_ROWS,
            time_limit: Some(DEFAULT_TIME_LIMIT),
        }
    }
}

/// Run a complete import of `upload` on behalf of `actor`.
///
/// Returns an [`ImportError`] only for pipeline-level failures, all of which
/// happen before the first insert. Everything that goes wrong with an
/// individual row is reported inside the [`ImportResult`].
pub async fn run_import<S>(
    sink: &S,
    upload: Option<&UploadedFile>,
    actor: Option<DbId>,
    limits: &ImportLimits,
    cancel: &CancellationToken,
) -> Result<ImportResult, ImportError>
where
    S: CustomerSink + ?Sized,
{
    let file = check_upload(upload, limits.max_upload_bytes)?;
    let rows = decode_rows(&file.bytes)?;

    if rows.len() > limits.max_rows {
        return Err(ImportError::TooManyRows {
            found: rows.len(),
            limit: limits.max_rows,
        });
    }

    tracing::info!(
        file_name = %file.file_name,
        size_bytes = file.bytes.len(),
        rows = rows.len(),
        "Starting customer import"
    );

    let result = import_rows(sink, &rows, actor, limits.time_limit, cancel).await;

    tracing::info!(
        total = result.total,
        success = result.success,
        failed = result.failed,
        "Customer import finished"
    );
    Ok(result)
}

/// Validate and insert `rows` strictly one at a time.
///
/// Cancellation and the time limit are checked between rows. Once either
/// trips, every remaining row is recorded as failed; rows already inserted
/// stay inserted.
pub async fn import_rows<S>(
    sink: &S,
    rows: &[ImportRow],
    actor: Option<DbId>,
    time_limit: Option<Duration>,
    cancel: &CancellationToken,
) -> ImportResult
where
    S: CustomerSink + ?Sized,
{
    let started = Instant::now();
    let mut result = ImportResult::new(rows.len());

    for (position, row) in rows.iter().enumerate() {
        if let Some(reason) = interruption(cancel, started, time_limit) {
            tracing::warn!(
                processed = position,
                remaining = rows.len() - position,
                reason,
                "Customer import interrupted"
            );
            for skipped in rows.iter().skip(position) {
                result.record_failure(RowError::new(skipped.display_row(), reason));
            }
            break;
        }

        match import_row(sink, row, actor).await {
            Ok(()) => result.record_success(),
            Err(error) => result.record_failure(error),
        }
    }

    debug_assert_eq!(result.processed(), result.total);
    result
}

/// Normalize and insert a single row.
async fn import_row<S>(sink: &S, row: &ImportRow, actor: Option<DbId>) -> Result<(), RowError>
where
    S: CustomerSink + ?Sized,
{
    let customer = NewCustomer {
        created_by: actor,
        ..normalize_row(row)?
    };

    match sink.insert(&customer).await {
        Ok(_) => Ok(()),
        Err(InsertError::DuplicateAccountNumber) => Err(RowError::new(
            row.display_row(),
            format!("Account number {} already exists", customer.account_number),
        )),
        Err(InsertError::Store(message)) => {
            tracing::debug!(row = row.display_row(), error = %message, "Row rejected by store");
            Err(RowError::new(row.display_row(), message))
        }
    }
}

fn interruption(
    cancel: &CancellationToken,
    started: Instant,
    time_limit: Option<Duration>,
) -> Option<&'static str> {
    if cancel.is_cancelled() {
        return Some(CANCELLED);
    }
    match time_limit {
        Some(limit) if started.elapsed() >= limit => Some(TIMED_OUT),
        _ => None,
    }
}
