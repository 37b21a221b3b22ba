//! Handler for bulk customer import (`POST /customers/import`).

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use crm_core::import::{run_import, ImportError, ImportResult, UploadedFile};
use crm_db::store::PgCustomerStore;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// POST /api/v1/customers/import
///
/// Accepts a multipart form with a `file` field (`.xlsx`, `.xls` or `.csv`)
/// and inserts one customer per data row. Row failures are reported in the
/// body with status 200; only problems with the upload as a whole are errors.
///
/// The row loop runs on its own task. If this request is dropped (client
/// disconnect or request timeout) the loop stops at the next row boundary.
pub async fn import_customers(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ImportResult>> {
    let limits = state.config.import.clone();
    let upload = read_upload(&mut multipart, limits.max_upload_bytes).await?;

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let store = PgCustomerStore::new(state.pool.clone());
    let actor = Some(user.user_id);

    let task = tokio::spawn(async move {
        run_import(&store, upload.as_ref(), actor, &limits, &cancel).await
    });
    let outcome = task
        .await
        .map_err(|e| AppError::InternalError(format!("Import task failed: {e}")))?;
    guard.disarm();

    let result = outcome?;
    tracing::info!(
        user_id = %user.user_id,
        total = result.total,
        success = result.success,
        failed = result.failed,
        "Customer import request completed"
    );
    Ok(Json(result))
}

/// Pull the `file` field out of the form. Other fields are ignored.
///
/// A file part with neither a name nor content (what browsers send when no
/// file was chosen) counts as no file.
async fn read_upload(
    multipart: &mut Multipart,
    max_upload_bytes: usize,
) -> AppResult<Option<UploadedFile>> {
    let to_app_error = |e: MultipartError| multipart_error(e, max_upload_bytes);
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(to_app_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(to_app_error)?;

        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        upload = Some(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok(upload)
}

/// A body that overran the route's size limit is an oversize upload; any
/// other multipart failure is a malformed request.
fn multipart_error(err: MultipartError, max_upload_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ImportError::PayloadTooLarge {
            limit_bytes: max_upload_bytes,
        }
        .into();
    }
    AppError::BadRequest(err.body_text())
}
