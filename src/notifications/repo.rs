use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Notification, NotificationUpdate};
use crate::db::StoreResult;

/// Every method takes the owner id; rows belonging to another user are
/// treated as absent.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, user_id: Uuid, message: &str) -> StoreResult<Notification>;
    async fn list_by_user(&self, user_id: Uuid, limit: i64, offset: i64)
        -> StoreResult<Vec<Notification>>;
    async fn get(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<Notification>>;
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &NotificationUpdate,
    ) -> StoreResult<Option<Notification>>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct PgNotificationStore {
    db: PgPool,
}

impl PgNotificationStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create(&self, user_id: Uuid, message: &str) -> StoreResult<Notification> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, message)
            VALUES ($1, $2)
            RETURNING id, user_id, message, is_read, created_at
            "#,
        )
        .bind(user_id)
        .bind(message)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, message, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<Notification>> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, message, is_read, created_at
            FROM notifications
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &NotificationUpdate,
    ) -> StoreResult<Option<Notification>> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
               SET message = COALESCE($3, message),
                   is_read = COALESCE($4, is_read)
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, message, is_read, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&update.message)
        .bind(update.is_read)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
