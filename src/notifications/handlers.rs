use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{
        CreateNotificationRequest, NotificationRead, Pagination, UpdateNotificationRequest,
        MAX_MESSAGE_LEN,
    },
    repo_types::NotificationUpdate,
};
use crate::{
    auth::extractors::CurrentUser,
    error::{AppError, AppResult},
    extract::{Json, Path, Query},
    state::AppState,
};

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications/",
            get(list_notifications).post(create_notification),
        )
        .route(
            "/notifications/:id",
            get(get_notification)
                .put(update_notification)
                .delete(delete_notification),
        )
}

fn validate_message(raw: &str) -> AppResult<String> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(AppError::bad_request("Message is required"));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::bad_request("Message too long"));
    }
    Ok(message.to_string())
}

fn not_found() -> AppError {
    AppError::not_found("Notification not found")
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_notification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateNotificationRequest>,
) -> AppResult<(StatusCode, Json<NotificationRead>)> {
    let message = validate_message(&body.message)?;
    let row = state.notifications.create(user.id, &message).await?;
    info!(notification_id = %row.id, "notification created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<NotificationRead>>> {
    let (limit, offset) = p.clamped();
    let rows = state
        .notifications
        .list_by_user(user.id, limit, offset)
        .await?;
    Ok(Json(rows.into_iter().map(NotificationRead::from).collect()))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_notification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<NotificationRead>> {
    let row = state
        .notifications
        .get(user.id, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(row.into()))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn update_notification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNotificationRequest>,
) -> AppResult<Json<NotificationRead>> {
    let update = NotificationUpdate {
        message: body.message.as_deref().map(validate_message).transpose()?,
        is_read: body.is_read,
    };
    let row = state
        .notifications
        .update(user.id, id, &update)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(row.into()))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_notification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.notifications.delete(user.id, id).await? {
        return Err(not_found());
    }
    info!("notification deleted");
    Ok(StatusCode::NO_CONTENT)
}
