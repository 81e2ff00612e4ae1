//! Inbox notification API endpoints

use api_types::{
    ApiResponse,
    inbox::{InboxNew, InboxNotification, UnreadCount},
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use engine::InboxCmd;

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath},
    server::{ServerState, UserId},
};

fn map_notification(notification: engine::InboxNotification) -> InboxNotification {
    InboxNotification {
        id: notification.id,
        title: notification.title,
        message: notification.message,
        kind: notification.kind.as_str().to_string(),
        link: notification.link,
        is_read: notification.is_read,
        created_at: notification.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<InboxNotification>>>, ServerError> {
    let notifications = state
        .engine
        .inbox(user.as_str())
        .await?
        .into_iter()
        .map(map_notification)
        .collect();

    Ok(Json(ApiResponse::data(notifications)))
}

pub async fn unread_count(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<UnreadCount>>, ServerError> {
    let count = state.engine.inbox_unread_count(user.as_str()).await?;
    Ok(Json(ApiResponse::data(UnreadCount { count })))
}

pub async fn create(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<InboxNew>,
) -> Result<(StatusCode, Json<ApiResponse<InboxNotification>>), ServerError> {
    let cmd = InboxCmd {
        title: payload.title,
        message: payload.message,
        kind: payload.kind,
        link: payload.link,
    };
    let notification = state
        .engine
        .create_inbox_notification(user.as_str(), cmd)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(map_notification(notification))),
    ))
}

pub async fn mark_read(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state.engine.mark_inbox_read(user.as_str(), &id).await?;
    Ok(Json(ApiResponse::message("Notification marked as read")))
}

pub async fn mark_all_read(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    let marked = state.engine.mark_all_inbox_read(user.as_str()).await?;
    Ok(Json(ApiResponse::message(format!(
        "Marked {marked} notifications as read"
    ))))
}

pub async fn delete(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state
        .engine
        .delete_inbox_notification(user.as_str(), &id)
        .await?;
    Ok(Json(ApiResponse::message("Notification deleted successfully")))
}

pub async fn delete_read(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    let deleted = state.engine.delete_read_inbox(user.as_str()).await?;
    Ok(Json(ApiResponse::message(format!(
        "Deleted {deleted} read notifications"
    ))))
}
