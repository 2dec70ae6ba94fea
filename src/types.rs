//! Domain types: user profiles, events, registrations, friend sets.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A user profile keyed by the external identity provider's user key.
///
/// The carbon-survey attributes are free-form values supplied by the end
/// user; `carbon_emission` is derived externally by the ML annotation step
/// and is never computed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    /// Identity key from the external identity provider.
    pub user_id: String,
    /// Body type survey answer.
    pub body_type: Option<String>,
    /// Sex survey answer.
    pub sex: Option<String>,
    /// Diet survey answer.
    pub diet: Option<String>,
    /// Shower frequency survey answer.
    pub how_often_shower: Option<String>,
    /// Home heating energy source.
    pub heating_energy_source: Option<String>,
    /// Primary transport mode.
    pub transport: Option<String>,
    /// Vehicle type, if any.
    pub vehicle_type: Option<String>,
    /// Social activity frequency.
    pub social_activity: Option<String>,
    /// Monthly grocery bill.
    pub monthly_grocery_bill: Option<f64>,
    /// Air travel frequency.
    pub frequency_of_traveling_by_air: Option<String>,
    /// Monthly vehicle distance in kilometers.
    pub vehicle_monthly_distance_km: Option<f64>,
    /// Waste bag size.
    pub waste_bag_size: Option<String>,
    /// Waste bags per week.
    pub waste_bag_weekly_count: Option<i32>,
    /// Daily TV/PC hours.
    pub tv_pc_daily_hours: Option<f64>,
    /// New clothes bought per month.
    pub new_clothes_monthly: Option<i32>,
    /// Daily internet hours.
    pub internet_daily_hours: Option<f64>,
    /// Whether the home uses energy-efficient appliances.
    pub energy_efficiency: Option<bool>,
    /// Materials the user recycles.
    #[serde(default)]
    pub recycling: Vec<String>,
    /// Cooking appliances in use.
    #[serde(default)]
    pub cooking_with: Vec<String>,
    /// Predicted carbon emission, set by the external ML service.
    pub carbon_emission: Option<f64>,
}

impl UserProfile {
    /// Create an empty profile for the given user key.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            body_type: None,
            sex: None,
            diet: None,
            how_often_shower: None,
            heating_energy_source: None,
            transport: None,
            vehicle_type: None,
            social_activity: None,
            monthly_grocery_bill: None,
            frequency_of_traveling_by_air: None,
            vehicle_monthly_distance_km: None,
            waste_bag_size: None,
            waste_bag_weekly_count: None,
            tv_pc_daily_hours: None,
            new_clothes_monthly: None,
            internet_daily_hours: None,
            energy_efficiency: None,
            recycling: Vec::new(),
            cooking_with: Vec::new(),
            carbon_emission: None,
        }
    }
}

/// An event hosted by a user, with capacity-limited registrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    /// Unique event key (`EVT_`-prefixed token, generated at creation).
    pub event_id: String,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Event date.
    pub date: NaiveDate,
    /// Event start time, as entered by the host.
    pub time: String,
    /// Venue address.
    pub address: String,
    /// User key of the hosting user.
    pub host_user_id: String,
    /// Event category.
    pub category: String,
    /// Maximum number of confirmed registrations.
    pub max_attendees: i64,
    /// Ticket price.
    pub price: f64,
    /// Whether the event is publicly visible.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Confirmed registrations, in registration order.
    #[sqlx(skip)]
    #[serde(default)]
    pub registrations: Vec<Registration>,
}

/// One confirmed registration for one event.
///
/// Immutable after creation except for the check-in flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Registration {
    /// User key of the attendee.
    pub user_id: String,
    /// Unique `TKT_`-prefixed ticket number.
    pub ticket_number: String,
    /// Email address the e-ticket was sent to.
    pub email: String,
    /// Whether the attendee has checked in at the venue.
    pub checked_in: bool,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

/// A user's social-graph sets, returned verbatim by the list operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendSets {
    /// Confirmed friends.
    pub friends: Vec<String>,
    /// Outgoing pending requests.
    pub requests_sent: Vec<String>,
    /// Incoming pending requests.
    pub requests_received: Vec<String>,
}
