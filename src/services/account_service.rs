// ==================== ACCOUNT LIFECYCLE ====================
// Signup, login, profile updates and the emailed one-time token flows
// (password reset, account deletion).

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use utoipa::ToSchema;

use super::auth_service::{generate_jwt, generate_one_time_token, hash_password, verify_password};
use super::email_service::{Mailer, Notification};
use crate::config::AppConfig;
use crate::database::Store;
use crate::models::{
    normalize_email, LoginRequest, LoginResponse, SignupRequest, Token, TokenPurpose, UpdatePasswordRequest,
    UpdatePushTokenRequest, UpdateUsernameRequest, User, UserInfo,
};
use crate::utils::{validate_request, AppError};

const MIN_PASSWORD_LEN: usize = 6;

// ==================== REQUEST MODELS ====================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub confirm_password: String,
    pub token: String,
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeleteAccountRequest {
    pub email: String,
    pub password: String,
    pub token: String,
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: String,
}

/// Query string of the links sent by email.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenLinkQuery {
    pub token: String,
    pub id: String,
}

// ==================== SERVICE FUNCTIONS ====================

async fn load_active_user(store: &dyn Store, user_id: &ObjectId) -> Result<User, AppError> {
    store
        .find_user(user_id)
        .await?
        .filter(|u| !u.deleted)
        .ok_or_else(|| AppError::not_found("User"))
}

fn parse_user_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::InvalidId("user"))
}

pub async fn signup(
    store: &dyn Store,
    mailer: &dyn Mailer,
    config: &AppConfig,
    request: SignupRequest,
) -> Result<User, AppError> {
    let request = request.normalized();
    validate_request(&request)?;

    if store.find_user_by_email(&request.email).await?.is_some() {
        return Err(AppError::invalid_field("email", "Email already exists"));
    }

    let now = Utc::now();
    let user = User {
        id: ObjectId::new(),
        email: request.email,
        username: request.username,
        password: hash_password(&request.password, config.bcrypt_cost)?,
        goals: Vec::new(),
        push_token: None,
        deleted: false,
        created_at: now,
        updated_at: now,
    };
    store.insert_user(&user).await?;

    mailer
        .send(&user.email, &Notification::Welcome { name: user.username.clone() })
        .await?;

    log::info!("✅ User registered successfully: {}", user.email);
    Ok(user)
}

pub async fn login(store: &dyn Store, config: &AppConfig, request: LoginRequest) -> Result<LoginResponse, AppError> {
    let user = store
        .find_user_by_email(&normalize_email(&request.email))
        .await?
        .filter(|u| !u.deleted)
        .ok_or_else(|| AppError::not_found("User"))?;

    if !verify_password(request.password.trim(), &user.password)? {
        return Err(AppError::NotFound("Password is not correct".to_string()));
    }

    Ok(LoginResponse {
        token: generate_jwt(config, &user)?,
        user: UserInfo::from(&user),
    })
}

/// Issues a fresh one-time token for `purpose`, superseding any previous one, and emails its link.
pub async fn request_one_time_token(
    store: &dyn Store,
    mailer: &dyn Mailer,
    config: &AppConfig,
    email: &str,
    purpose: TokenPurpose,
) -> Result<(), AppError> {
    let user = store
        .find_user_by_email(&normalize_email(email))
        .await?
        .filter(|u| !u.deleted)
        .ok_or_else(|| match purpose {
            TokenPurpose::PasswordReset => AppError::NotFound("Email is not recognized!".to_string()),
            TokenPurpose::AccountDeletion => AppError::not_found("User"),
        })?;

    let superseded = store.delete_tokens(&user.id, purpose).await?;
    if superseded > 0 {
        log::debug!("Superseded {} {} token(s) for {}", superseded, purpose.label(), user.id);
    }

    let plaintext = generate_one_time_token();
    let token = Token::new(user.id, purpose, hash_password(&plaintext, config.bcrypt_cost)?);
    store.insert_token(&token).await?;

    let path = match purpose {
        TokenPurpose::PasswordReset => "change-password",
        TokenPurpose::AccountDeletion => "delete-account",
    };
    let link = format!(
        "{}/{}?token={}&id={}",
        config.public_url,
        path,
        urlencoding::encode(&plaintext),
        user.id.to_hex()
    );

    let name = user.username.clone();
    let expires_minutes = config.one_time_token_ttl_minutes;
    let notification = match purpose {
        TokenPurpose::PasswordReset => Notification::PasswordResetRequested { name, link, expires_minutes },
        TokenPurpose::AccountDeletion => Notification::AccountDeletionRequested { name, link, expires_minutes },
    };
    mailer.send(&user.email, &notification).await?;

    log::info!("📨 {} link sent to user {}", purpose.label(), user.id);
    Ok(())
}

/// Checks `plaintext` against the stored hash and deletes the token on success.
pub async fn consume_one_time_token(
    store: &dyn Store,
    config: &AppConfig,
    user_id: &ObjectId,
    purpose: TokenPurpose,
    plaintext: &str,
) -> Result<(), AppError> {
    let invalid = || AppError::InvalidToken(purpose.label());

    let token = store.find_token(user_id, purpose).await?.ok_or_else(invalid)?;

    if token.is_expired(config.one_time_token_ttl_minutes) {
        store.delete_token(&token.id).await?;
        return Err(invalid());
    }
    if !verify_password(plaintext, &token.token)? {
        return Err(invalid());
    }

    // A concurrent request may have consumed it first.
    if !store.delete_token(&token.id).await? {
        return Err(invalid());
    }
    Ok(())
}

pub async fn reset_password(
    store: &dyn Store,
    mailer: &dyn Mailer,
    config: &AppConfig,
    request: ResetPasswordRequest,
) -> Result<(), AppError> {
    if request.password != request.confirm_password {
        return Err(AppError::invalid_field(
            "confirm_password",
            "Passwords are not the same! Try again",
        ));
    }
    let password = request.password.trim();
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_field("password", "Password must be at least 6 characters"));
    }

    let user_id = parse_user_id(&request.user_id)?;
    let mut user = load_active_user(store, &user_id).await?;

    consume_one_time_token(store, config, &user_id, TokenPurpose::PasswordReset, &request.token).await?;

    user.password = hash_password(password, config.bcrypt_cost)?;
    user.updated_at = Utc::now();
    store.save_user(&user).await?;

    mailer
        .send(&user.email, &Notification::PasswordChanged { name: user.username.clone() })
        .await?;

    log::info!("🔑 Password reset for user {}", user_id);
    Ok(())
}

/// Deletes the user, then their goals and those goals' reminders. Not atomic.
pub async fn delete_user_data(store: &dyn Store, user: &User) -> Result<u64, AppError> {
    store.delete_user(&user.id).await?;

    let goal_ids: Vec<ObjectId> = store
        .find_goals_by_author(&user.id)
        .await?
        .iter()
        .map(|g| g.id)
        .collect();
    let reminders = store.delete_reminders_for_goals(&goal_ids).await?;
    let goals = store.delete_goals_by_author(&user.id).await?;

    store.delete_tokens(&user.id, TokenPurpose::PasswordReset).await?;
    store.delete_tokens(&user.id, TokenPurpose::AccountDeletion).await?;

    log::info!("🗑️ User {} deleted with {} goals and {} reminders", user.id, goals, reminders);
    Ok(goals)
}

pub async fn delete_account(
    store: &dyn Store,
    mailer: &dyn Mailer,
    config: &AppConfig,
    request: DeleteAccountRequest,
) -> Result<(), AppError> {
    let user_id = parse_user_id(&request.user_id)?;
    let user = load_active_user(store, &user_id).await?;

    if user.email != normalize_email(&request.email) {
        return Err(AppError::NotFound("User is not recognized!".to_string()));
    }

    consume_one_time_token(store, config, &user_id, TokenPurpose::AccountDeletion, &request.token).await?;

    if !verify_password(request.password.trim(), &user.password)? {
        return Err(AppError::NotFound("Password is not correct".to_string()));
    }

    delete_user_data(store, &user).await?;

    mailer
        .send(&user.email, &Notification::AccountDeleted { name: user.username.clone() })
        .await?;
    Ok(())
}

pub async fn get_profile(store: &dyn Store, user_id: &ObjectId) -> Result<User, AppError> {
    load_active_user(store, user_id).await
}

pub async fn update_username(
    store: &dyn Store,
    user_id: &ObjectId,
    request: UpdateUsernameRequest,
) -> Result<User, AppError> {
    let request = UpdateUsernameRequest {
        username: request.username.trim().to_string(),
    };
    validate_request(&request)?;

    let mut user = load_active_user(store, user_id).await?;
    user.username = request.username;
    user.updated_at = Utc::now();
    store.save_user(&user).await?;
    Ok(user)
}

pub async fn update_password(
    store: &dyn Store,
    mailer: &dyn Mailer,
    config: &AppConfig,
    user_id: &ObjectId,
    request: UpdatePasswordRequest,
) -> Result<(), AppError> {
    let request = UpdatePasswordRequest {
        new_password: request.new_password.trim().to_string(),
        ..request
    };
    validate_request(&request)?;

    let mut user = load_active_user(store, user_id).await?;
    if !verify_password(request.current_password.trim(), &user.password)? {
        return Err(AppError::NotFound("Password is not correct".to_string()));
    }

    user.password = hash_password(&request.new_password, config.bcrypt_cost)?;
    user.updated_at = Utc::now();
    store.save_user(&user).await?;

    mailer
        .send(&user.email, &Notification::PasswordChanged { name: user.username.clone() })
        .await?;
    Ok(())
}

pub async fn update_push_token(
    store: &dyn Store,
    user_id: &ObjectId,
    request: UpdatePushTokenRequest,
) -> Result<User, AppError> {
    let mut user = load_active_user(store, user_id).await?;
    user.push_token = request
        .push_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    user.updated_at = Utc::now();
    store.save_user(&user).await?;
    Ok(user)
}
