use std::time::Duration;

use crm_core::import::ImportLimits;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum pooled database connections (default: `20`).
    pub database_max_connections: u32,
    /// JWT signing secret and session lifetime.
    pub jwt: JwtConfig,
    /// Mark the session cookie `Secure` (default: `false`).
    pub session_cookie_secure: bool,
    /// Resource bounds for bulk imports.
    pub import: ImportLimits,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                       |
    /// | `SESSION_COOKIE_SECURE`    | `false`                    |
    /// | `IMPORT_MAX_UPLOAD_BYTES`  | `10485760`                 |
    /// | `IMPORT_MAX_ROWS`          | `10000`                    |
    /// | `IMPORT_TIME_LIMIT_SECS`   | `25` (`0` disables)        |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values; misconfiguration should stop startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_or("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 30);
        let database_max_connections: u32 = env_or("DATABASE_MAX_CONNECTIONS", 20);
        let session_cookie_secure: bool = env_or("SESSION_COOKIE_SECURE", false);

        let defaults = ImportLimits::default();
        let time_limit_secs: u64 = env_or(
            "IMPORT_TIME_LIMIT_SECS",
            defaults.time_limit.map_or(0, |d| d.as_secs()),
        );
        let import = ImportLimits {
            max_upload_bytes: env_or("IMPORT_MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            max_rows: env_or("IMPORT_MAX_ROWS", defaults.max_rows),
            time_limit: (time_limit_secs > 0).then(|| Duration::from_secs(time_limit_secs)),
        };

        if import
            .time_limit
            .is_some_and(|limit| limit.as_secs() >= request_timeout_secs)
        {
            tracing::warn!(
                time_limit_secs,
                request_timeout_secs,
                "IMPORT_TIME_LIMIT_SECS is not below REQUEST_TIMEOUT_SECS; large imports may be cut off by the request timeout"
            );
        }

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_max_connections,
            jwt,
            session_cookie_secure,
            import,
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid value: {e}")),
        Err(_) => default,
    }
}
