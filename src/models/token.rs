use chrono::{Duration, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// What a one-time token may be exchanged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenPurpose {
    PasswordReset,
    AccountDeletion,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::PasswordReset => "PASSWORD_RESET",
            TokenPurpose::AccountDeletion => "ACCOUNT_DELETION",
        }
    }

    /// Human label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            TokenPurpose::PasswordReset => "password reset",
            TokenPurpose::AccountDeletion => "account deletion",
        }
    }
}

/// One-time token document (collection "tokens"); only the bcrypt hash is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub purpose: TokenPurpose,
    pub token: String,
    /// BSON date so the TTL index can reap it.
    pub created_at: BsonDateTime,
}

impl Token {
    pub fn new(user_id: ObjectId, purpose: TokenPurpose, hash: String) -> Self {
        Token {
            id: ObjectId::new(),
            user_id,
            purpose,
            token: hash,
            created_at: BsonDateTime::now(),
        }
    }

    pub fn is_expired(&self, ttl_minutes: i64) -> bool {
        let expires_at = self.created_at.timestamp_millis() + Duration::minutes(ttl_minutes).num_milliseconds();
        Utc::now().timestamp_millis() >= expires_at
    }
}
