use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewUser, PreferencesUpdate, ProfileUpdate, User};
use crate::{auth::password::HashedPassword, db::StoreResult};

/// Credential store. Username and email uniqueness is enforced by the
/// backing store and surfaces as [`crate::db::StoreError::Conflict`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn create(&self, new_user: NewUser) -> StoreResult<User>;
    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> StoreResult<Option<User>>;
    async fn update_preferences(
        &self,
        id: Uuid,
        update: &PreferencesUpdate,
    ) -> StoreResult<Option<User>>;
    /// Returns `false` when no user has this id.
    async fn update_password(&self, id: Uuid, hash: &HashedPassword) -> StoreResult<bool>;
}

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
                            phone_number, dark_mode, font_size, created_at";

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(new_user.password_hash.as_str())
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.phone_number)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET email        = COALESCE($2, email),
                   first_name   = CASE WHEN $3 THEN $4 ELSE first_name END,
                   last_name    = CASE WHEN $5 THEN $6 ELSE last_name END,
                   phone_number = CASE WHEN $7 THEN $8 ELSE phone_number END
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.email)
        .bind(update.first_name.is_some())
        .bind(update.first_name.clone().flatten())
        .bind(update.last_name.is_some())
        .bind(update.last_name.clone().flatten())
        .bind(update.phone_number.is_some())
        .bind(update.phone_number.clone().flatten())
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_preferences(
        &self,
        id: Uuid,
        update: &PreferencesUpdate,
    ) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET dark_mode = COALESCE($2, dark_mode),
                   font_size = COALESCE($3, font_size)
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.dark_mode)
        .bind(update.font_size.map(|f| f.as_str()))
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_password(&self, id: Uuid, hash: &HashedPassword) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash.as_str())
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
