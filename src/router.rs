//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints.

use crate::auth::require_api_token;
use crate::handlers::{events, friends, health, users};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete Axum router.
///
/// All API routes sit behind the bearer-token layer; `/health` is open.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/create", post(users::create_user))
        .route("/get", post(users::get_user))
        .route("/leaderboard", get(users::leaderboard));

    let friend_routes = Router::new()
        .route("/send-request", post(friends::send_request))
        .route("/accept-request", post(friends::accept_request))
        .route("/reject-request", post(friends::reject_request))
        .route("/list", post(friends::list));

    let event_routes = Router::new()
        .route("/create", post(events::create_event))
        .route("/register", post(events::register))
        .route("/get-events", get(events::list_events));

    let api_routes = Router::new()
        .nest("/user", user_routes)
        .nest("/friends", friend_routes)
        .nest("/event", event_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_token,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
