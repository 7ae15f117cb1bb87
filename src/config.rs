use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// SMTP credentials; present only when EMAIL_USER and EMAIL_PASS are set.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

/// Process configuration, read once at startup and shared through `web::Data`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub one_time_token_ttl_minutes: i64,
    pub public_url: String,
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?;
        let database_name =
            get("MONGODB_DATABASE").unwrap_or_else(|| database_name_from_uri(&database_url));

        let smtp = match (get("EMAIL_USER"), get("EMAIL_PASS")) {
            (Some(username), Some(password)) => Some(SmtpConfig {
                host: get("EMAIL_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: parse_or("EMAIL_PORT", get("EMAIL_PORT"), 587)?,
                from_address: get("EMAIL_FROM")
                    .unwrap_or_else(|| format!("Goals App <{}>", username)),
                username,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", get("PORT"), 8080)?,
            database_url,
            database_name,
            jwt_secret: get("SECRET_JWT").ok_or(ConfigError::Missing("SECRET_JWT"))?,
            jwt_issuer: get("JWT_ISSUER").unwrap_or_else(|| "goals-service".to_string()),
            jwt_ttl_days: parse_or("JWT_TTL_DAYS", get("JWT_TTL_DAYS"), 10)?,
            bcrypt_cost: parse_or("BCRYPT_COST", get("BCRYPT_COST"), 12)?,
            one_time_token_ttl_minutes: parse_or(
                "ONE_TIME_TOKEN_TTL_MINUTES",
                get("ONE_TIME_TOKEN_TTL_MINUTES"),
                60,
            )?,
            public_url: get("PUBLIC_URL")
                .or_else(|| get("GOALS_URL"))
                .unwrap_or_else(|| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            smtp,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// Extracts the database name from the URI path, e.g. `mongodb://host/goals?retryWrites=true`.
pub fn database_name_from_uri(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path)
        .and_then(|path| path.split('?').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("goals")
        .to_string()
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "mongodb://localhost:27017/goals_test".to_string(),
            database_name: "goals_test".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_issuer: "goals-service".to_string(),
            jwt_ttl_days: 10,
            bcrypt_cost: 4,
            one_time_token_ttl_minutes: 60,
            public_url: "http://localhost:8080".to_string(),
            smtp: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost:27017/goalsdb?retryWrites=true"),
            ("SECRET_JWT", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_name, "goalsdb");
        assert_eq!(config.jwt_ttl_days, 10);
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.one_time_token_ttl_minutes, 60);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn test_missing_secret_fails() {
        let result = AppConfig::from_lookup(lookup_from(&[("MONGODB_URI", "mongodb://localhost")]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("SECRET_JWT"));
    }

    #[test]
    fn test_invalid_port_fails() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("SECRET_JWT", "s3cret"),
            ("PORT", "eighty"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));
    }

    #[test]
    fn test_smtp_and_legacy_url() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost"),
            ("SECRET_JWT", "s3cret"),
            ("EMAIL_USER", "goals@example.com"),
            ("EMAIL_PASS", "pw"),
            ("GOALS_URL", "https://goals.example.com/"),
        ]))
        .unwrap();

        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.host, "smtp.gmail.com");
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.from_address, "Goals App <goals@example.com>");
        assert_eq!(config.public_url, "https://goals.example.com");
    }

    #[test]
    fn test_database_name_from_uri() {
        assert_eq!(database_name_from_uri("mongodb://localhost:27017"), "goals");
        assert_eq!(database_name_from_uri("mongodb://localhost:27017/"), "goals");
        assert_eq!(
            database_name_from_uri("mongodb+srv://u:p@cluster.net/tracker?w=majority"),
            "tracker"
        );
    }
}
