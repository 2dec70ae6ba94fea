//! Carbon-footprint tracking backend.
//!
//! A thin HTTP API over a document-shaped domain: user profiles with
//! carbon-survey attributes, an event registry with capacity-limited
//! registration and emailed QR e-tickets, and a friend graph.
//!
//! # Architecture
//!
//! ```text
//! HTTP (axum handlers)
//!   └── AppState (injected dependencies, no globals)
//!        ├── UserStore / EventStore (PostgreSQL or in-memory)
//!        └── EmailProvider (SMTP, console, or recording)
//! ```
//!
//! The two races the naive design invites are closed at the store seam:
//! registration's capacity and duplicate checks commit atomically with the
//! append, and friend-graph writes are transactional so the relationship
//! can never end up asymmetric.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod providers;
pub mod router;
pub mod state;
pub mod stores;
pub mod ticket;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use router::build_router;
pub use state::AppState;
