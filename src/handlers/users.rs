//! User profile endpoints.
//!
//! - POST /user/create - create a profile
//! - POST /user/get - fetch a profile by key
//! - GET /user/leaderboard - users with a non-null carbon emission

use crate::error::{Error, Result};
use crate::state::AppState;
use crate::types::UserProfile;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Response after creating a profile.
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    /// Success message.
    pub message: String,
    /// The created profile.
    pub user: UserProfile,
}

/// Request to fetch a profile.
#[derive(Debug, Deserialize)]
pub struct GetUserRequest {
    /// Identity key of the profile to fetch.
    pub user_id: String,
}

/// Response carrying one profile.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Success message.
    pub message: String,
    /// The profile.
    pub user: UserProfile,
}

/// Leaderboard response.
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    /// Users with a non-null carbon emission, unranked.
    pub users: Vec<UserProfile>,
}

/// Create a new user profile.
///
/// The profile is keyed by the identity provider's user key. The
/// `carbon_emission` field is ignored on create; only the external
/// annotation step sets it.
pub async fn create_user(
    State(state): State<AppState>,
    Json(mut profile): Json<UserProfile>,
) -> Result<(StatusCode, Json<CreateUserResponse>)> {
    if profile.user_id.trim().is_empty() {
        return Err(Error::Validation("user_id must not be empty".to_string()));
    }
    profile.carbon_emission = None;

    let user = state.users.create_user(&profile).await?;
    tracing::info!(user_id = %user.user_id, "user profile created");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// Fetch a user profile by key.
pub async fn get_user(
    State(state): State<AppState>,
    Json(req): Json<GetUserRequest>,
) -> Result<Json<UserResponse>> {
    let user = state.users.get_user(&req.user_id).await?;
    Ok(Json(UserResponse {
        message: "User found".to_string(),
        user,
    }))
}

/// List all users with a non-null carbon emission.
///
/// Ranking happens in the presentation layer; the order here is the
/// store's natural order.
pub async fn leaderboard(State(state): State<AppState>) -> Result<Json<LeaderboardResponse>> {
    let users = state.users.leaderboard().await?;
    Ok(Json(LeaderboardResponse { users }))
}
