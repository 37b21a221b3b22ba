pub mod auth;
pub mod customers;
pub mod health;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                  create account (public)
/// /auth/login                     login (public)
/// /auth/logout                    logout (public)
/// /auth/me                        current user
///
/// /customers                      list, create
/// /customers/import               bulk import (multipart)
/// /customers/{id}                 get, update, delete
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/customers", customers::router(config.import.max_upload_bytes))
}
