//! Storage traits for user profiles, the friend graph, and events.
//!
//! Stores are injected into [`crate::state::AppState`] as trait objects so
//! handlers stay independent of the backing engine. The PostgreSQL
//! implementation is the production store; the in-memory implementation
//! backs tests.

use crate::error::Result;
use crate::types::{Event, FriendSets, Registration, UserProfile};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// User profile and friend graph storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user profile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UserAlreadyExists`] if the user key is taken.
    async fn create_user(&self, user: &UserProfile) -> Result<UserProfile>;

    /// Fetch a user profile by key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UserNotFound`] if no profile exists.
    async fn get_user(&self, user_id: &str) -> Result<UserProfile>;

    /// All users with a non-null carbon emission, in natural order.
    ///
    /// Ranking happens in the presentation layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn leaderboard(&self) -> Result<Vec<UserProfile>>;

    /// Record a pending friend request from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Fails if either user is missing, the pair is already friends, or an
    /// identical request is already pending.
    async fn send_friend_request(&self, from: &str, to: &str) -> Result<()>;

    /// Accept a pending request, establishing symmetric friendship.
    ///
    /// Both friendship edges and the pending-request removal commit
    /// together; a crash can never leave the relationship asymmetric.
    ///
    /// # Errors
    ///
    /// Fails if either user is missing or no matching request is pending.
    async fn accept_friend_request(&self, accepting: &str, requesting: &str) -> Result<()>;

    /// Remove a pending request, if one exists.
    ///
    /// A missing request is silently a no-op; a rejected pair may send a
    /// fresh request later.
    ///
    /// # Errors
    ///
    /// Fails if either user is missing.
    async fn reject_friend_request(&self, rejecting: &str, requesting: &str) -> Result<()>;

    /// A user's friends and pending-request sets.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UserNotFound`] if no profile exists.
    async fn friend_sets(&self, user_id: &str) -> Result<FriendSets>;
}

/// Event and registration storage.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event with an empty registration list.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn create_event(&self, event: &Event) -> Result<Event>;

    /// Fetch one event with its registrations.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EventNotFound`] if no event exists.
    async fn get_event(&self, event_id: &str) -> Result<Event>;

    /// All events ordered by ascending date, each with its registrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Append a registration, enforcing capacity and uniqueness atomically.
    ///
    /// The capacity check, duplicate check, and append are one atomic unit:
    /// under a concurrent burst of N+1 requests for the last N seats,
    /// exactly N succeed. Returns the updated event.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EventNotFound`],
    /// [`crate::Error::CapacityExceeded`], or
    /// [`crate::Error::DuplicateRegistration`] when the corresponding
    /// precondition fails.
    async fn register_attendee(&self, event_id: &str, registration: &Registration)
    -> Result<Event>;
}
