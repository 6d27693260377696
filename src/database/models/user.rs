use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use crate::utils::datetime::now_timestamp;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64, // telegram user id
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub is_bot: bool,
    pub is_premium: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Profile fields reported by Telegram on contact.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub language_code: Option<String>,
    pub is_bot: bool,
    pub is_premium: bool,
}

impl From<&teloxide::types::User> for UserProfile {
    fn from(user: &teloxide::types::User) -> Self {
        Self {
            id: user.id.0 as i64,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            language_code: user.language_code.clone(),
            is_bot: user.is_bot,
            is_premium: user.is_premium,
        }
    }
}

impl User {
    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, first_name, last_name, language_code, is_bot, is_premium, created_at, updated_at FROM users WHERE id = ?"
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Inserts the user on first contact. An existing row is returned as stored;
    /// profile fields from later contacts are ignored.
    pub async fn get_or_create(
        pool: &sqlx::SqlitePool,
        profile: &UserProfile,
    ) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, first_name, last_name, language_code, is_bot, is_premium, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#
        )
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.language_code)
        .bind(profile.is_bot)
        .bind(profile.is_premium)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, profile.id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name, last),
            _ => self.first_name.clone(),
        }
    }
}
