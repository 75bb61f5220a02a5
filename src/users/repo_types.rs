use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::password::HashedPassword;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string, never exposed in JSON
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub dark_mode: bool,
    pub font_size: String,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn font_size(&self) -> FontSize {
        self.font_size.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontSize {
    Small,
    #[default]
    Normal,
    Large,
}

impl FontSize {
    pub fn as_str(self) -> &'static str {
        match self {
            FontSize::Small => "Small",
            FontSize::Normal => "Normal",
            FontSize::Large => "Large",
        }
    }
}

impl std::str::FromStr for FontSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Small" => Ok(FontSize::Small),
            "Normal" => Ok(FontSize::Normal),
            "Large" => Ok(FontSize::Large),
            other => anyhow::bail!("unknown font size {other:?}"),
        }
    }
}

/// Insert payload; the password can only arrive already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: HashedPassword,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

/// Fields left as `None` keep their stored value. For the optional columns
/// `Some(None)` stores NULL.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub phone_number: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct PreferencesUpdate {
    pub dark_mode: Option<bool>,
    pub font_size: Option<FontSize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_parses_known_values() {
        assert_eq!("Large".parse::<FontSize>().unwrap(), FontSize::Large);
        assert_eq!(FontSize::Small.as_str(), "Small");
        assert!("huge".parse::<FontSize>().is_err());
    }
}
