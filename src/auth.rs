//! API authentication middleware.
//!
//! The upstream identity provider authenticates end users; this layer only
//! verifies that the caller holds the backend's API token, so identity keys
//! in request bodies can't be replayed by arbitrary callers.

use crate::error::Error;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use constant_time_eq::constant_time_eq;

/// Require `Authorization: Bearer <api_token>` on the request.
///
/// # Errors
///
/// Returns [`Error::Unauthorized`] if the header is missing, malformed, or
/// carries the wrong token.
pub async fn require_api_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Error> {
    let header = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or(Error::Unauthorized)?;

    let token = header.strip_prefix("Bearer ").ok_or(Error::Unauthorized)?;

    if token.is_empty() || !constant_time_eq(token.as_bytes(), state.api_token.as_bytes()) {
        return Err(Error::Unauthorized);
    }

    Ok(next.run(req).await)
}
