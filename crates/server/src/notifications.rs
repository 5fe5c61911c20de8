//! Notification endpoints.

use api_types::notification::NotificationView;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn view(model: engine::notifications::Model) -> NotificationView {
    NotificationView {
        notification_id: model.id,
        message: model.message,
        read: model.read,
        created_at: model.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<NotificationView>>, ServerError> {
    let notifications = state.engine.list_notifications(&user.id, 20).await?;
    Ok(Json(notifications.into_iter().map(view).collect()))
}

pub async fn mark_read(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<NotificationView>, ServerError> {
    let notification_id = Uuid::parse_str(&id)
        .map_err(|_| ServerError::Generic("invalid notification id".to_string()))?;
    let notification = state
        .engine
        .mark_notification_read(&user.id, notification_id)
        .await?;
    Ok(Json(view(notification)))
}
