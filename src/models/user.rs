use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// User document (collection "users")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub username: String,
    /// bcrypt hash
    pub password: String,
    #[serde(default)]
    pub goals: Vec<ObjectId>,
    #[serde(default)]
    pub push_token: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Emails are stored and looked up lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(email(message = "Please enter valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl SignupRequest {
    pub fn normalized(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self.username = self.username.trim().to_string();
        self.password = self.password.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUsernameRequest {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePushTokenRequest {
    pub push_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id.to_hex(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub goals: Vec<String>,
    pub push_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id.to_hex(),
            username: user.username.clone(),
            email: user.email.clone(),
            goals: user.goals.iter().map(|id| id.to_hex()).collect(),
            push_token: user.push_token.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}
