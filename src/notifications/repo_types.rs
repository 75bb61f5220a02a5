use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationUpdate {
    pub message: Option<String>,
    pub is_read: Option<bool>,
}
