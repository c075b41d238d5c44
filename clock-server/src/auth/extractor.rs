//! AdminAccess extractor
//!
//! Handlers take [`AdminAccess`] as an argument; it is only present when
//! [`require_admin`](super::require_admin) accepted the request.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::AdminAccess;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AdminAccess>() {
            Some(access) => Ok(access.clone()),
            None => {
                security_log!("WARN", "admin_missing", uri = format!("{:?}", parts.uri));
                Err(AppError::not_authenticated())
            }
        }
    }
}
