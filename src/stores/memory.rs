//! In-memory store for testing.
//!
//! All collections live behind one mutex, so every operation is atomic with
//! respect to its precondition checks. The capacity invariant therefore
//! holds under concurrent registration exactly as it does for the
//! PostgreSQL store.

use crate::error::{Error, Result};
use crate::stores::{EventStore, UserStore};
use crate::types::{Event, FriendSets, Registration, UserProfile};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<String, UserProfile>,
    events: HashMap<String, Event>,
    /// Directed friendship edges; symmetry is maintained by the accept path.
    friendships: BTreeSet<(String, String)>,
    /// Pending requests as (from, to) pairs.
    requests: BTreeSet<(String, String)>,
}

/// In-memory user and event store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::Internal("store lock poisoned".to_string()))
    }

    fn check_users_exist(inner: &Inner, ids: &[&str]) -> Result<()> {
        for id in ids {
            if !inner.users.contains_key(*id) {
                return Err(Error::UserNotFound((*id).to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: &UserProfile) -> Result<UserProfile> {
        let mut inner = self.lock()?;
        if inner.users.contains_key(&user.user_id) {
            return Err(Error::UserAlreadyExists(user.user_id.clone()));
        }
        inner.users.insert(user.user_id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn get_user(&self, user_id: &str) -> Result<UserProfile> {
        self.lock()?
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))
    }

    async fn leaderboard(&self) -> Result<Vec<UserProfile>> {
        let inner = self.lock()?;
        let mut users: Vec<UserProfile> = inner
            .users
            .values()
            .filter(|u| u.carbon_emission.is_some())
            .cloned()
            .collect();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(users)
    }

    async fn send_friend_request(&self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return Err(Error::Validation(
                "cannot send a friend request to yourself".to_string(),
            ));
        }

        let mut inner = self.lock()?;
        Self::check_users_exist(&inner, &[from, to])?;

        if inner
            .friendships
            .contains(&(from.to_string(), to.to_string()))
        {
            return Err(Error::AlreadyFriends);
        }
        if !inner.requests.insert((from.to_string(), to.to_string())) {
            return Err(Error::DuplicateFriendRequest);
        }
        Ok(())
    }

    async fn accept_friend_request(&self, accepting: &str, requesting: &str) -> Result<()> {
        let mut inner = self.lock()?;
        Self::check_users_exist(&inner, &[accepting, requesting])?;

        if !inner
            .requests
            .remove(&(requesting.to_string(), accepting.to_string()))
        {
            return Err(Error::NoPendingRequest);
        }
        inner
            .friendships
            .insert((accepting.to_string(), requesting.to_string()));
        inner
            .friendships
            .insert((requesting.to_string(), accepting.to_string()));
        Ok(())
    }

    async fn reject_friend_request(&self, rejecting: &str, requesting: &str) -> Result<()> {
        let mut inner = self.lock()?;
        Self::check_users_exist(&inner, &[rejecting, requesting])?;

        // Absent request is a deliberate no-op.
        inner
            .requests
            .remove(&(requesting.to_string(), rejecting.to_string()));
        Ok(())
    }

    async fn friend_sets(&self, user_id: &str) -> Result<FriendSets> {
        let inner = self.lock()?;
        Self::check_users_exist(&inner, &[user_id])?;

        let friends = inner
            .friendships
            .iter()
            .filter(|(a, _)| a == user_id)
            .map(|(_, b)| b.clone())
            .collect();
        let requests_sent = inner
            .requests
            .iter()
            .filter(|(from, _)| from == user_id)
            .map(|(_, to)| to.clone())
            .collect();
        let requests_received = inner
            .requests
            .iter()
            .filter(|(_, to)| to == user_id)
            .map(|(from, _)| from.clone())
            .collect();

        Ok(FriendSets {
            friends,
            requests_sent,
            requests_received,
        })
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create_event(&self, event: &Event) -> Result<Event> {
        let mut inner = self.lock()?;
        inner.events.insert(event.event_id.clone(), event.clone());
        Ok(event.clone())
    }

    async fn get_event(&self, event_id: &str) -> Result<Event> {
        self.lock()?
            .events
            .get(event_id)
            .cloned()
            .ok_or_else(|| Error::EventNotFound(event_id.to_string()))
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let inner = self.lock()?;
        let mut events: Vec<Event> = inner.events.values().cloned().collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event_id.cmp(&b.event_id)));
        Ok(events)
    }

    async fn register_attendee(
        &self,
        event_id: &str,
        registration: &Registration,
    ) -> Result<Event> {
        // Single lock section: checks and append are one atomic unit.
        let mut inner = self.lock()?;
        let event = inner
            .events
            .get_mut(event_id)
            .ok_or_else(|| Error::EventNotFound(event_id.to_string()))?;

        if event.registrations.len() as i64 >= event.max_attendees {
            return Err(Error::CapacityExceeded(event_id.to_string()));
        }
        if event
            .registrations
            .iter()
            .any(|r| r.user_id == registration.user_id)
        {
            return Err(Error::DuplicateRegistration {
                event_id: event_id.to_string(),
                user_id: registration.user_id.clone(),
            });
        }

        event.registrations.push(registration.clone());
        Ok(event.clone())
    }
}
