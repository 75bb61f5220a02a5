use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Notification;

pub const MAX_MESSAGE_LEN: usize = 255;

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNotificationRequest {
    pub message: Option<String>,
    pub is_read: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationRead {
    pub id: Uuid,
    pub message: String,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Notification> for NotificationRead {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            message: n.message,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 { 10 }

impl Pagination {
    /// `(limit, offset)` with limit in 1..=100 and a non-negative offset.
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.skip.max(0))
    }
}
