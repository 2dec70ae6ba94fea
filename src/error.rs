//! Error taxonomy for the ecotrack backend.
//!
//! Every failure mode has a stable machine-readable code and a distinct HTTP
//! status. Handlers return `Result<_, Error>` and the `IntoResponse`
//! implementation maps the error onto the wire as `{code, message}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Result type alias for ecotrack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error taxonomy for the ecotrack backend.
#[derive(Debug, Error)]
pub enum Error {
    /// User profile not found.
    #[error("user {0} not found")]
    UserNotFound(String),

    /// Event not found.
    #[error("event {0} not found")]
    EventNotFound(String),

    /// A profile already exists for this user key.
    #[error("user {0} already exists")]
    UserAlreadyExists(String),

    /// The event has reached its maximum attendee count.
    #[error("event {0} is already full")]
    CapacityExceeded(String),

    /// The user already holds a registration for this event.
    #[error("user {user_id} is already registered for event {event_id}")]
    DuplicateRegistration {
        /// Event key.
        event_id: String,
        /// User key.
        user_id: String,
    },

    /// Both users already appear in each other's friends set.
    #[error("users are already friends")]
    AlreadyFriends,

    /// A pending request between these users already exists.
    #[error("friend request already sent")]
    DuplicateFriendRequest,

    /// No pending request exists to accept.
    #[error("no pending friend request found")]
    NoPendingRequest,

    /// Request payload failed validation.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid API token.
    #[error("missing or invalid API token")]
    Unauthorized,

    /// E-ticket email could not be delivered.
    #[error("email delivery failed: {0}")]
    Email(String),

    /// Storage operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Internal failure (QR rendering, serialization, poisoned locks).
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound(_) | Self::EventNotFound(_) => StatusCode::NOT_FOUND,
            Self::UserAlreadyExists(_)
            | Self::CapacityExceeded(_)
            | Self::DuplicateRegistration { .. }
            | Self::AlreadyFriends
            | Self::DuplicateFriendRequest
            | Self::NoPendingRequest => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Email(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for client error handling.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::EventNotFound(_) => "EVENT_NOT_FOUND",
            Self::UserAlreadyExists(_) => "USER_ALREADY_EXISTS",
            Self::CapacityExceeded(_) => "EVENT_FULL",
            Self::DuplicateRegistration { .. } => "ALREADY_REGISTERED",
            Self::AlreadyFriends => "ALREADY_FRIENDS",
            Self::DuplicateFriendRequest => "REQUEST_ALREADY_SENT",
            Self::NoPendingRequest => "NO_PENDING_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Email(_) => "EMAIL_DELIVERY_FAILED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: &'static str,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = %status, code = %self.code(), error = %self, "request failed");
        }

        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            Error::UserNotFound("alice".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::EventNotFound("EVT_1".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn precondition_failures_map_to_409() {
        assert_eq!(
            Error::CapacityExceeded("EVT_1".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            Error::DuplicateRegistration {
                event_id: "EVT_1".into(),
                user_id: "alice".into(),
            }
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(Error::AlreadyFriends.status(), StatusCode::CONFLICT);
        assert_eq!(Error::NoPendingRequest.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(Error::CapacityExceeded("e".into()).code(), "EVENT_FULL");
        assert_eq!(Error::Unauthorized.code(), "UNAUTHORIZED");
        assert_eq!(Error::Validation("bad".into()).code(), "VALIDATION_ERROR");
    }

    #[test]
    fn display_includes_ids() {
        let err = Error::DuplicateRegistration {
            event_id: "EVT_1".into(),
            user_id: "alice".into(),
        };
        assert_eq!(
            err.to_string(),
            "user alice is already registered for event EVT_1"
        );
    }
}
