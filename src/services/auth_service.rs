use base64::Engine;
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::User;
use crate::utils::AppError;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id (hex ObjectId)
    pub email: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub iss: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(&self.sub).map_err(|_| AppError::Unauthenticated)
    }
}

/// Signs an HS256 bearer token valid for `jwt_ttl_days`.
pub fn generate_jwt(config: &AppConfig, user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_hex(),
        email: user.email.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(config.jwt_ttl_days)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        iss: config.jwt_issuer.clone(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?)
}

pub fn verify_token(secret: &str, issuer: &str, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)?;
    Ok(data.claims)
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(hash(password, cost)?)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed)?)
}

/// 32 random bytes, base64url without padding. Only its bcrypt hash is persisted.
pub fn generate_one_time_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn user() -> User {
        User {
            id: ObjectId::new(),
            email: "jane@example.com".into(),
            username: "jane".into(),
            password: String::new(),
            goals: vec![],
            push_token: None,
            deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let config = AppConfig::for_tests();
        let user = user();
        let token = generate_jwt(&config, &user).unwrap();

        let claims = verify_token(&config.jwt_secret, &config.jwt_issuer, &token).unwrap();
        assert_eq!(claims.sub, user.id.to_hex());
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.user_id().unwrap(), user.id);

        let ten_days = Duration::days(10).num_seconds() as usize;
        assert!(claims.exp - claims.iat >= ten_days - 1);
    }

    #[test]
    fn test_jwt_wrong_secret_rejected() {
        let config = AppConfig::for_tests();
        let token = generate_jwt(&config, &user()).unwrap();
        let result = verify_token("another-secret", &config.jwt_issuer, &token);
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_expired_jwt_rejected() {
        let config = AppConfig {
            jwt_ttl_days: -1,
            ..AppConfig::for_tests()
        };
        let token = generate_jwt(&config, &user()).unwrap();
        assert!(verify_token(&config.jwt_secret, &config.jwt_issuer, &token).is_err());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hashed = hash_password("secret1", 4).unwrap();
        assert!(verify_password("secret1", &hashed).unwrap());
        assert!(!verify_password("secret2", &hashed).unwrap());
    }

    #[test]
    fn test_one_time_tokens_are_unique_and_url_safe() {
        let a = generate_one_time_token();
        let b = generate_one_time_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
