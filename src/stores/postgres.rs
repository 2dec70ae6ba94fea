//! PostgreSQL store implementation.
//!
//! Registrations live in their own table with a `(event_id, user_id)`
//! primary key, so duplicate registration is enforced by the store itself.
//! The capacity check rides on a conditional counter update against the
//! event row; the update and the registration insert commit in one
//! transaction, which closes the check-then-append race.

use crate::error::{Error, Result};
use crate::stores::{EventStore, UserStore};
use crate::types::{Event, FriendSets, Registration, UserProfile};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

/// PostgreSQL-backed user and event store.
#[derive(Clone)]
pub struct PostgresStore {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

/// Registration row joined with its event key, used to group the
/// per-event registration lists in one pass.
#[derive(sqlx::FromRow)]
struct RegistrationRow {
    event_id: String,
    #[sqlx(flatten)]
    registration: Registration,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl PostgresStore {
    /// Create a new PostgreSQL store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns error if migrations fail.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("migration failed: {e}")))?;
        Ok(())
    }

    /// Verify every listed user exists, naming the first missing one.
    async fn check_users_exist(&self, ids: &[&str]) -> Result<()> {
        for id in ids {
            let row: Option<(String,)> =
                sqlx::query_as("SELECT user_id FROM users WHERE user_id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            if row.is_none() {
                return Err(Error::UserNotFound((*id).to_string()));
            }
        }
        Ok(())
    }

    async fn registrations_for(&self, event_id: &str) -> Result<Vec<Registration>> {
        let regs: Vec<Registration> = sqlx::query_as(
            r"
            SELECT user_id, ticket_number, email, checked_in, registered_at
            FROM registrations
            WHERE event_id = $1
            ORDER BY registered_at, user_id
            ",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(regs)
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn create_user(&self, user: &UserProfile) -> Result<UserProfile> {
        sqlx::query(
            r"
            INSERT INTO users (
                user_id, body_type, sex, diet, how_often_shower,
                heating_energy_source, transport, vehicle_type, social_activity,
                monthly_grocery_bill, frequency_of_traveling_by_air,
                vehicle_monthly_distance_km, waste_bag_size, waste_bag_weekly_count,
                tv_pc_daily_hours, new_clothes_monthly, internet_daily_hours,
                energy_efficiency, recycling, cooking_with, carbon_emission
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21)
            ",
        )
        .bind(&user.user_id)
        .bind(&user.body_type)
        .bind(&user.sex)
        .bind(&user.diet)
        .bind(&user.how_often_shower)
        .bind(&user.heating_energy_source)
        .bind(&user.transport)
        .bind(&user.vehicle_type)
        .bind(&user.social_activity)
        .bind(user.monthly_grocery_bill)
        .bind(&user.frequency_of_traveling_by_air)
        .bind(user.vehicle_monthly_distance_km)
        .bind(&user.waste_bag_size)
        .bind(user.waste_bag_weekly_count)
        .bind(user.tv_pc_daily_hours)
        .bind(user.new_clothes_monthly)
        .bind(user.internet_daily_hours)
        .bind(user.energy_efficiency)
        .bind(&user.recycling)
        .bind(&user.cooking_with)
        .bind(user.carbon_emission)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::UserAlreadyExists(user.user_id.clone())
            } else {
                Error::from(e)
            }
        })?;

        Ok(user.clone())
    }

    async fn get_user(&self, user_id: &str) -> Result<UserProfile> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::UserNotFound(user_id.to_string()))
    }

    async fn leaderboard(&self) -> Result<Vec<UserProfile>> {
        let users = sqlx::query_as::<_, UserProfile>(
            "SELECT * FROM users WHERE carbon_emission IS NOT NULL ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn send_friend_request(&self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return Err(Error::Validation(
                "cannot send a friend request to yourself".to_string(),
            ));
        }
        self.check_users_exist(&[from, to]).await?;

        let already_friends: Option<(String,)> = sqlx::query_as(
            "SELECT user_id FROM friendships WHERE user_id = $1 AND friend_id = $2",
        )
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;
        if already_friends.is_some() {
            return Err(Error::AlreadyFriends);
        }

        let inserted = sqlx::query(
            r"
            INSERT INTO friend_requests (from_id, to_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await?;
        if inserted.rows_affected() == 0 {
            return Err(Error::DuplicateFriendRequest);
        }
        Ok(())
    }

    async fn accept_friend_request(&self, accepting: &str, requesting: &str) -> Result<()> {
        self.check_users_exist(&[accepting, requesting]).await?;

        // Consume the pending request and write both friendship edges in one
        // transaction, so the relationship can never end up asymmetric.
        let mut tx = self.pool.begin().await?;

        let consumed = sqlx::query("DELETE FROM friend_requests WHERE from_id = $1 AND to_id = $2")
            .bind(requesting)
            .bind(accepting)
            .execute(&mut *tx)
            .await?;
        if consumed.rows_affected() == 0 {
            return Err(Error::NoPendingRequest);
        }

        sqlx::query(
            r"
            INSERT INTO friendships (user_id, friend_id)
            VALUES ($1, $2), ($2, $1)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(accepting)
        .bind(requesting)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn reject_friend_request(&self, rejecting: &str, requesting: &str) -> Result<()> {
        self.check_users_exist(&[rejecting, requesting]).await?;

        // Absent request is a deliberate no-op.
        sqlx::query("DELETE FROM friend_requests WHERE from_id = $1 AND to_id = $2")
            .bind(requesting)
            .bind(rejecting)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn friend_sets(&self, user_id: &str) -> Result<FriendSets> {
        self.check_users_exist(&[user_id]).await?;

        let friends: Vec<(String,)> =
            sqlx::query_as("SELECT friend_id FROM friendships WHERE user_id = $1 ORDER BY friend_id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        let sent: Vec<(String,)> =
            sqlx::query_as("SELECT to_id FROM friend_requests WHERE from_id = $1 ORDER BY to_id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        let received: Vec<(String,)> =
            sqlx::query_as("SELECT from_id FROM friend_requests WHERE to_id = $1 ORDER BY from_id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(FriendSets {
            friends: friends.into_iter().map(|(id,)| id).collect(),
            requests_sent: sent.into_iter().map(|(id,)| id).collect(),
            requests_received: received.into_iter().map(|(id,)| id).collect(),
        })
    }
}

#[async_trait]
impl EventStore for PostgresStore {
    async fn create_event(&self, event: &Event) -> Result<Event> {
        sqlx::query(
            r"
            INSERT INTO events (
                event_id, title, description, date, time, address,
                host_user_id, category, max_attendees, price, is_public, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(&event.event_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.address)
        .bind(&event.host_user_id)
        .bind(&event.category)
        .bind(event.max_attendees)
        .bind(event.price)
        .bind(event.is_public)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;

        Ok(event.clone())
    }

    async fn get_event(&self, event_id: &str) -> Result<Event> {
        let mut event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE event_id = $1")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::EventNotFound(event_id.to_string()))?;

        event.registrations = self.registrations_for(event_id).await?;
        Ok(event)
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let mut events =
            sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date, event_id")
                .fetch_all(&self.pool)
                .await?;

        let rows: Vec<RegistrationRow> = sqlx::query_as(
            r"
            SELECT event_id, user_id, ticket_number, email, checked_in, registered_at
            FROM registrations
            ORDER BY registered_at, user_id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_event: HashMap<String, Vec<Registration>> = HashMap::new();
        for row in rows {
            by_event
                .entry(row.event_id)
                .or_default()
                .push(row.registration);
        }
        for event in &mut events {
            if let Some(regs) = by_event.remove(&event.event_id) {
                event.registrations = regs;
            }
        }
        Ok(events)
    }

    async fn register_attendee(
        &self,
        event_id: &str,
        registration: &Registration,
    ) -> Result<Event> {
        let mut tx = self.pool.begin().await?;

        // Conditional counter bump locks the event row and revalidates
        // capacity at write time.
        let bumped = sqlx::query(
            r"
            UPDATE events
            SET attendee_count = attendee_count + 1
            WHERE event_id = $1 AND attendee_count < max_attendees
            ",
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        if bumped.rows_affected() == 0 {
            let exists: Option<(String,)> =
                sqlx::query_as("SELECT event_id FROM events WHERE event_id = $1")
                    .bind(event_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(if exists.is_some() {
                Error::CapacityExceeded(event_id.to_string())
            } else {
                Error::EventNotFound(event_id.to_string())
            });
        }

        sqlx::query(
            r"
            INSERT INTO registrations
                (event_id, user_id, ticket_number, email, checked_in, registered_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(event_id)
        .bind(&registration.user_id)
        .bind(&registration.ticket_number)
        .bind(&registration.email)
        .bind(registration.checked_in)
        .bind(registration.registered_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicateRegistration {
                    event_id: event_id.to_string(),
                    user_id: registration.user_id.clone(),
                }
            } else {
                Error::from(e)
            }
        })?;

        tx.commit().await?;

        self.get_event(event_id).await
    }
}
