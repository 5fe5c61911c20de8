//! Notification rows: the fire-and-forget sink, persisted in-transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, notifications};

use super::Engine;

/// Queue a message for a user inside the caller's transaction. The row
/// exists iff the triggering operation commits.
pub(crate) async fn notify<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    message: &str,
) -> ResultEngine<()> {
    notifications::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id.to_string()),
        message: Set(message.to_string()),
        read: Set(false),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(())
}

impl Engine {
    /// Latest notifications for a user.
    pub async fn list_notifications(
        &self,
        user_id: &str,
        limit: u64,
    ) -> ResultEngine<Vec<notifications::Model>> {
        Ok(notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(limit)
            .all(&self.database)
            .await?)
    }

    /// Mark one of the user's notifications as read.
    pub async fn mark_notification_read(
        &self,
        user_id: &str,
        notification_id: Uuid,
    ) -> ResultEngine<notifications::Model> {
        let row = notifications::Entity::find_by_id(notification_id.to_string())
            .filter(notifications::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("notification not exists".to_string()))?;

        let mut active: notifications::ActiveModel = row.into();
        active.read = Set(true);
        Ok(active.update(&self.database).await?)
    }
}
