//! Handlers for the `/auth` resource (register, login, logout, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use crm_core::customer::optional_text;
use crm_core::error::CoreError;
use crm_db::models::user::{CreateUser, User, UserResponse};
use crm_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_session_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, UNAUTHORIZED_MESSAGE};
use crate::response::DataResponse;
use crate::state::AppState;

/// A response carrying the updated cookie jar.
type WithCookie<T> = (CookieJar, Json<T>);

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `POST /auth/logout`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and start a session. Returns 201 with the new user.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<DataResponse<UserResponse>>)> {
    let (email, password) = credentials(input.email.as_deref(), input.password.as_deref())?;

    validate_password_strength(password).map_err(CoreError::Validation)?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(CoreError::Conflict("User already exists".into()).into());
    }

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            name: optional_text(input.name.as_deref()),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    let (jar, body) = start_session(&state, jar, user)?;
    Ok((StatusCode::CREATED, jar, body))
}

/// POST /api/v1/auth/login
///
/// Verify credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<WithCookie<DataResponse<UserResponse>>> {
    let (email, password) = credentials(input.email.as_deref(), input.password.as_deref())?;

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    tracing::info!(user_id = %user.id, "User logged in");
    start_session(&state, jar, user)
}

/// POST /api/v1/auth/logout
///
/// Clear the session cookie. Succeeds whether or not a session exists.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> WithCookie<MessageResponse> {
    (
        jar.add(clear_session_cookie(state.config.session_cookie_secure)),
        Json(MessageResponse {
            message: "Logout successful",
        }),
    )
}

/// GET /api/v1/auth/me
///
/// The user behind the current session.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(UNAUTHORIZED_MESSAGE.into())))?;

    Ok(Json(DataResponse { data: user.into() }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trimmed email plus the raw password; both must be non-empty.
fn credentials<'a>(
    email: Option<&str>,
    password: Option<&'a str>,
) -> Result<(String, &'a str), AppError> {
    let email = email.map(str::trim).filter(|e| !e.is_empty());
    let password = password.filter(|p| !p.is_empty());
    match (email, password) {
        (Some(email), Some(password)) => Ok((email.to_string(), password)),
        _ => Err(CoreError::Validation("Email and password are required".into()).into()),
    }
}

/// Sign a session token for `user` and attach it as a cookie.
fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: User,
) -> AppResult<WithCookie<DataResponse<UserResponse>>> {
    let token = generate_session_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let cookie = session_cookie(
        token,
        state.config.jwt.session_ttl_secs(),
        state.config.session_cookie_secure,
    );

    Ok((jar.add(cookie), Json(DataResponse { data: user.into() })))
}
