//! HTTP handlers, grouped by resource.

pub mod events;
pub mod friends;
pub mod health;
pub mod users;
