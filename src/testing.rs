//! In-memory store implementations used by the test suite.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::password::HashedPassword,
    db::{StoreError, StoreResult},
    notifications::{
        repo::NotificationStore,
        repo_types::{Notification, NotificationUpdate},
    },
    users::{
        repo::UserStore,
        repo_types::{FontSize, NewUser, PreferencesUpdate, ProfileUpdate, User},
    },
};

/// Mirrors the unique indexes on `users.username` and `users.email`.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    notifications: Mutex<Vec<Notification>>,
}

fn check_unique(users: &[User], skip_id: Option<Uuid>, username: &str, email: &str) -> StoreResult<()> {
    let others = users.iter().filter(|u| Some(u.id) != skip_id);
    for u in others {
        if u.username == username {
            return Err(StoreError::Conflict("users_username_key".into()));
        }
        if u.email == email {
            return Err(StoreError::Conflict("users_email_key".into()));
        }
    }
    Ok(())
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> StoreResult<User> {
        let mut users = self.users.lock().unwrap();
        check_unique(&users, None, &new_user.username, &new_user.email)?;
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash.as_str().to_string(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            phone_number: new_user.phone_number,
            dark_mode: false,
            font_size: FontSize::Normal.as_str().to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> StoreResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(idx) = users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &update.email {
            let username = users[idx].username.clone();
            check_unique(&users, Some(id), &username, email)?;
        }
        let user = &mut users[idx];
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(v) = &update.first_name {
            user.first_name = v.clone();
        }
        if let Some(v) = &update.last_name {
            user.last_name = v.clone();
        }
        if let Some(v) = &update.phone_number {
            user.phone_number = v.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn update_preferences(
        &self,
        id: Uuid,
        update: &PreferencesUpdate,
    ) -> StoreResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(dark_mode) = update.dark_mode {
            user.dark_mode = dark_mode;
        }
        if let Some(font_size) = update.font_size {
            user.font_size = font_size.as_str().to_string();
        }
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: Uuid, hash: &HashedPassword) -> StoreResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = hash.as_str().to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, user_id: Uuid, message: &str) -> StoreResult<Notification> {
        let row = Notification {
            id: Uuid::new_v4(),
            user_id,
            message: message.to_string(),
            is_read: false,
            created_at: OffsetDateTime::now_utc(),
        };
        self.notifications.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Notification>> {
        let rows = self.notifications.lock().unwrap();
        // Insertion order stands in for created_at; newest first.
        Ok(rows
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<Notification>> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id && n.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &NotificationUpdate,
    ) -> StoreResult<Option<Notification>> {
        let mut rows = self.notifications.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|n| n.id == id && n.user_id == user_id) else {
            return Ok(None);
        };
        if let Some(message) = &update.message {
            row.message = message.clone();
        }
        if let Some(is_read) = update.is_read {
            row.is_read = is_read;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut rows = self.notifications.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| !(n.id == id && n.user_id == user_id));
        Ok(rows.len() != before)
    }
}
