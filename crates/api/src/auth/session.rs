//! The `session` cookie carrying the signed session token.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Cookie that stores `token` for `max_age_secs`.
pub fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Cookie that expires the session immediately.
///
/// Added to the jar rather than removed from it, so the browser is told to
/// drop the cookie even when the request did not carry one.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    session_cookie(String::new(), 0, secure)
}

/// The session token from the request's cookies, if present and non-empty.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
