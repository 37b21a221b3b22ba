//! Request extractors for authentication.
//!
//! - [`auth::AuthUser`] -- the user identified by the session cookie or a
//!   Bearer token.

pub mod auth;
