use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{FontSize, User};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Absent fields are kept; `null` clears an optional field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    #[serde(default, with = "double_option")]
    pub first_name: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub last_name: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub phone_number: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub dark_mode: Option<bool>,
    pub font_size: Option<FontSize>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Public view of a user; carries no credential material.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserRead {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub dark_mode: bool,
    pub font_size: FontSize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserRead {
    fn from(u: User) -> Self {
        let font_size = u.font_size();
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            phone_number: u.phone_number,
            dark_mode: u.dark_mode,
            font_size,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_request_distinguishes_absent_from_null() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"first_name":"Ann","phone_number":null}"#).unwrap();
        assert_eq!(req.first_name, Some(Some("Ann".to_string())));
        assert_eq!(req.last_name, None);
        assert_eq!(req.phone_number, Some(None));
        assert_eq!(req.email, None);
    }
}
