//! Session-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use crm_core::error::CoreError;
use crm_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::auth::session::session_token;
use crate::error::AppError;
use crate::state::AppState;

/// Message returned for every unauthenticated request.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Please login to continue.";

/// Authenticated user, taken from the `session` cookie or an
/// `Authorization: Bearer <token>` header.
///
/// The cookie is tried first. A stale or tampered cookie does not hide a
/// valid bearer token sent alongside it.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let claims = session_token(&jar)
            .into_iter()
            .chain(bearer_token(&parts.headers))
            .find_map(|token| {
                validate_token(&token, &state.config.jwt)
                    .map_err(|e| tracing::debug!(error = %e, "Rejected session token"))
                    .ok()
            })
            .ok_or_else(unauthorized)?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn unauthorized() -> AppError {
    AppError::Core(CoreError::Unauthorized(UNAUTHORIZED_MESSAGE.into()))
}
