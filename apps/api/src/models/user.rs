use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    /// Argon2id PHC string. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
pub(crate) fn sample_user() -> UserRow {
    UserRow {
        id: Uuid::new_v4(),
        email: "ada@example.com".to_string(),
        full_name: "Ada Obi".to_string(),
        role: "student".to_string(),
        password_hash: "$argon2id$fake".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
