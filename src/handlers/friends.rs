//! Friend graph endpoints.
//!
//! - POST /friends/send-request
//! - POST /friends/accept-request
//! - POST /friends/reject-request
//! - POST /friends/list

use crate::error::Result;
use crate::state::AppState;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

/// Request to send a friend request.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    /// User key of the sender.
    pub from_user_id: String,
    /// User key of the recipient.
    pub to_user_id: String,
}

/// Request to accept a pending friend request.
#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    /// User key of the accepting user.
    pub accepting_user_id: String,
    /// User key of the original requester.
    pub requesting_user_id: String,
}

/// Request to reject a pending friend request.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    /// User key of the rejecting user.
    pub rejecting_user_id: String,
    /// User key of the original requester.
    pub requesting_user_id: String,
}

/// Request to list a user's social-graph sets.
#[derive(Debug, Deserialize)]
pub struct ListRequest {
    /// User key to list.
    pub user_id: String,
}

/// Generic success message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Success message.
    pub message: String,
}

/// A user's friends and pending-request sets.
#[derive(Debug, Serialize)]
pub struct FriendListResponse {
    /// Confirmed friends.
    pub friends: Vec<String>,
    /// Outgoing pending requests.
    pub requests_sent: Vec<String>,
    /// Incoming pending requests.
    pub requests_received: Vec<String>,
}

/// Send a friend request.
pub async fn send_request(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .users
        .send_friend_request(&req.from_user_id, &req.to_user_id)
        .await?;
    tracing::info!(from = %req.from_user_id, to = %req.to_user_id, "friend request sent");

    Ok(Json(MessageResponse {
        message: "Friend request sent successfully".to_string(),
    }))
}

/// Accept a pending friend request, establishing symmetric friendship.
pub async fn accept_request(
    State(state): State<AppState>,
    Json(req): Json<AcceptRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .users
        .accept_friend_request(&req.accepting_user_id, &req.requesting_user_id)
        .await?;
    tracing::info!(
        accepting = %req.accepting_user_id,
        requesting = %req.requesting_user_id,
        "friend request accepted"
    );

    Ok(Json(MessageResponse {
        message: "Friend request accepted successfully".to_string(),
    }))
}

/// Reject a pending friend request.
///
/// A missing pending request is silently a no-op; rejection never blocks a
/// future request.
pub async fn reject_request(
    State(state): State<AppState>,
    Json(req): Json<RejectRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .users
        .reject_friend_request(&req.rejecting_user_id, &req.requesting_user_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Friend request rejected successfully".to_string(),
    }))
}

/// List a user's friends and pending-request sets.
pub async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> Result<Json<FriendListResponse>> {
    let sets = state.users.friend_sets(&req.user_id).await?;
    Ok(Json(FriendListResponse {
        friends: sets.friends,
        requests_sent: sets.requests_sent,
        requests_received: sets.requests_received,
    }))
}
