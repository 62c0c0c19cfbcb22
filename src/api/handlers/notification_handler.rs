//! Notification inbox handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Notification;
use crate::errors::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCount {
    pub unread: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkedRead {
    pub marked: u64,
}

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread", get(unread_count))
        .route("/read-all", post(mark_all_read))
        .route("/:id/read", post(mark_read))
}

/// The current account's notifications, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Notifications", body = Vec<Notification>))
)]
pub async fn list_notifications(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Notification>>> {
    Ok(Json(
        state.services.notifications().list_for(current_user.id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/notifications/unread",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Unread count", body = UnreadCount))
)]
pub async fn unread_count(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UnreadCount>> {
    let unread = state
        .services
        .notifications()
        .unread_count(current_user.id)
        .await?;
    Ok(Json(UnreadCount { unread }))
}

/// Mark one of the current account's notifications as read
#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 404, description = "No such notification for this account")
    )
)]
pub async fn mark_read(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    let notification = state
        .services
        .notifications()
        .mark_read(current_user.id, id)
        .await?;
    Ok(Json(notification))
}

#[utoipa::path(
    post,
    path = "/notifications/read-all",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Number of notifications marked", body = MarkedRead))
)]
pub async fn mark_all_read(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<MarkedRead>> {
    let marked = state
        .services
        .notifications()
        .mark_all_read(current_user.id)
        .await?;
    Ok(Json(MarkedRead { marked }))
}
