//! Event endpoints.
//!
//! - POST /event/create - create an event
//! - POST /event/register - register for an event and email the e-ticket
//! - GET /event/get-events - list events by ascending date

use crate::error::{Error, Result};
use crate::state::AppState;
use crate::ticket;
use crate::types::{Event, Registration};
use crate::utils::is_valid_email;
use axum::{Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Request to create a new event.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Event date.
    pub date: NaiveDate,
    /// Event start time.
    pub time: String,
    /// Venue address.
    pub address: String,
    /// User key of the hosting user.
    pub host_user_id: String,
    /// Event category.
    pub category: String,
    /// Maximum number of attendees.
    pub max_attendees: i64,
    /// Ticket price, defaults to 0.
    #[serde(default)]
    pub price: f64,
    /// Whether the event is publicly visible, defaults to true.
    #[serde(default = "default_true")]
    pub is_public: bool,
}

const fn default_true() -> bool {
    true
}

/// Response after creating an event.
#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    /// Success message.
    pub message: String,
    /// The created event.
    pub event: Event,
}

/// Request to register for an event.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Event key.
    pub event_id: String,
    /// User key of the attendee.
    pub user_id: String,
    /// Address to send the e-ticket to.
    pub email: String,
}

/// Response after a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Success message.
    pub message: String,
    /// The issued ticket number.
    pub ticket_number: String,
}

/// Response listing all events.
#[derive(Debug, Serialize)]
pub struct ListEventsResponse {
    /// All events, ascending by date.
    pub events: Vec<Event>,
}

/// Create a new event.
///
/// Generates a unique `EVT_` key and persists the event with an empty
/// registration list. Duplicate titles are not checked.
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreateEventResponse>)> {
    if req.max_attendees < 0 {
        return Err(Error::Validation(
            "max_attendees must not be negative".to_string(),
        ));
    }

    let event = Event {
        event_id: ticket::generate_event_id(),
        title: req.title,
        description: req.description,
        date: req.date,
        time: req.time,
        address: req.address,
        host_user_id: req.host_user_id,
        category: req.category,
        max_attendees: req.max_attendees,
        price: req.price,
        is_public: req.is_public,
        created_at: Utc::now(),
        registrations: Vec::new(),
    };

    let event = state.events.create_event(&event).await?;
    tracing::info!(event_id = %event.event_id, title = %event.title, "event created");

    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            message: "Event created successfully".to_string(),
            event,
        }),
    ))
}

/// Register a user for an event and email the e-ticket.
///
/// The capacity and duplicate checks commit atomically with the append, so
/// an event can never be oversubscribed by concurrent requests. The email
/// is dispatched on a background task once the registration has committed;
/// a delivery failure is logged but not rolled back.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    if !is_valid_email(&req.email) {
        return Err(Error::Validation(format!(
            "invalid email address: {}",
            req.email
        )));
    }

    let ticket_number = ticket::generate_ticket_number();
    let qr_png = ticket::qr_png(&req.event_id, &req.user_id, &ticket_number)?;

    let registration = Registration {
        user_id: req.user_id.clone(),
        ticket_number: ticket_number.clone(),
        email: req.email.clone(),
        checked_in: false,
        registered_at: Utc::now(),
    };

    let event = state
        .events
        .register_attendee(&req.event_id, &registration)
        .await?;

    tracing::info!(
        event_id = %event.event_id,
        user_id = %req.user_id,
        ticket_number = %ticket_number,
        "registration confirmed"
    );

    let html = ticket::render_eticket_html(&event, &ticket_number, &ticket::qr_data_uri(&qr_png));
    let subject = format!("Your E-Ticket for {}", event.title);
    let mailer = state.mailer.clone();
    let to = req.email;
    tokio::spawn(async move {
        if let Err(err) = mailer.send_eticket(&to, &subject, &html, &qr_png).await {
            // Known gap: the registration is already committed at this
            // point, so the attendee holds a seat without a ticket email.
            tracing::error!(error = %err, to = %to, "e-ticket delivery failed after commit");
        }
    });

    Ok(Json(RegisterResponse {
        message: "Registration successful. E-ticket has been sent to your email.".to_string(),
        ticket_number,
    }))
}

/// List all events ordered by ascending date.
pub async fn list_events(State(state): State<AppState>) -> Result<Json<ListEventsResponse>> {
    let events = state.events.list_events().await?;
    Ok(Json(ListEventsResponse { events }))
}
