//! Notification data and event data API endpoints.
//!
//! Both stores are filled by budget, todo and recipe writes. Clients can
//! only read them.

use api_types::{
    ApiResponse,
    derived::{EventRecord, NotificationRecord},
};
use axum::{
    Extension, Json,
    extract::State,
};
use chrono::NaiveDate;
use engine::{DerivedStore, EngineError, MonthKey};
use serde::Deserialize;

use crate::{
    ServerError,
    extract::{ApiPath, ApiQuery},
    server::{ServerState, UserId},
};

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    /// Start of the window. Defaults to the local date.
    today: Option<NaiveDate>,
}

fn map_notification(notification: engine::Notification) -> NotificationRecord {
    NotificationRecord {
        category: notification.category().to_string(),
        id: notification.id,
        title: notification.title,
        due_date: notification.due_date,
        priority: notification.priority.as_str().to_string(),
        repeat_type: notification.repeat_type.as_str().to_string(),
        source_type: notification.source_type.as_str().to_string(),
        source_id: notification.source_id,
        month_key: notification.month_key.map(|key| key.to_string()),
        created_at: notification.created_at,
        updated_at: notification.updated_at,
    }
}

fn map_event(event: engine::Event) -> EventRecord {
    EventRecord {
        category: event.category().to_string(),
        id: event.id,
        title: event.title,
        date: event.date,
        description: event.description,
        priority: event.priority.as_str().to_string(),
        repeat_type: event.repeat_type.as_str().to_string(),
        source_type: event.source_type.as_str().to_string(),
        source_id: event.source_id,
        month_key: event.month_key.map(|key| key.to_string()),
        created_at: event.created_at,
        updated_at: event.updated_at,
    }
}

pub async fn notifications(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<NotificationRecord>>>, ServerError> {
    let notifications = state
        .engine
        .notifications(user.as_str())
        .await?
        .into_iter()
        .map(map_notification)
        .collect();

    Ok(Json(ApiResponse::data(notifications)))
}

pub async fn upcoming(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<UpcomingQuery>,
) -> Result<Json<ApiResponse<Vec<NotificationRecord>>>, ServerError> {
    let today = query
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let notifications = state
        .engine
        .upcoming_notifications(user.as_str(), today)
        .await?
        .into_iter()
        .map(map_notification)
        .collect();

    Ok(Json(ApiResponse::data(notifications)))
}

pub async fn notification_new(State(state): State<ServerState>) -> Result<(), ServerError> {
    state
        .engine
        .create_derived_record(DerivedStore::Notifications)?;
    Ok(())
}

pub async fn notification_delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<(), ServerError> {
    state
        .engine
        .delete_derived_record(DerivedStore::Notifications, &id)?;
    Ok(())
}

pub async fn events(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<EventRecord>>>, ServerError> {
    let events = state
        .engine
        .events(user.as_str())
        .await?
        .into_iter()
        .map(map_event)
        .collect();

    Ok(Json(ApiResponse::data(events)))
}

fn parse_year_month(year: &str, month: &str) -> Result<MonthKey, EngineError> {
    let invalid = || EngineError::InvalidMonthKey(format!("{year}-{month}"));
    let year = year.parse().map_err(|_| invalid())?;
    let month = month.parse().map_err(|_| invalid())?;
    MonthKey::new(year, month)
}

pub async fn events_in_month(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath((year, month)): ApiPath<(String, String)>,
) -> Result<Json<ApiResponse<Vec<EventRecord>>>, ServerError> {
    let month = parse_year_month(&year, &month)?;
    let events = state
        .engine
        .events_in_month(user.as_str(), month)
        .await?
        .into_iter()
        .map(map_event)
        .collect();

    Ok(Json(ApiResponse::data(events)))
}

pub async fn event_new(State(state): State<ServerState>) -> Result<(), ServerError> {
    state.engine.create_derived_record(DerivedStore::Events)?;
    Ok(())
}

pub async fn event_delete(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<(), ServerError> {
    state
        .engine
        .delete_derived_record(DerivedStore::Events, &id)?;
    Ok(())
}
