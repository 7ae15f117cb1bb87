use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::models::WorkflowError;
use crate::services::email_service::EmailError;

/// Single field failure reported in the `data` array of a 422 response.
#[derive(Debug, Clone, Serialize, PartialEq, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated.")]
    Unauthenticated,

    #[error("{0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Not authorized")]
    NotAuthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid {0} id")]
    InvalidId(&'static str),

    #[error("Invalid or expired {0} token")]
    InvalidToken(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Validation {
        message: String,
        data: Vec<FieldError>,
    },

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Email not sent: {0}")]
    Email(#[from] EmailError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }

    pub fn validation(message: impl Into<String>, data: Vec<FieldError>) -> Self {
        AppError::Validation {
            message: message.into(),
            data,
        }
    }

    /// Validation failure on a single field.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        AppError::validation(
            format!("Validation failed: {} in {}.", message, field),
            vec![FieldError {
                field: field.to_string(),
                message: message.to_string(),
            }],
        )
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a [FieldError]>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotAuthorized | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidId(_) | AppError::InvalidToken(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Workflow(WorkflowError::DayNotRecorded(_)) => StatusCode::NOT_FOUND,
            AppError::Workflow(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // Bad or expired JWTs surface as server errors.
            AppError::Jwt(_)
            | AppError::Database(_)
            | AppError::Hashing(_)
            | AppError::Email(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let data = match self {
            AppError::Validation { data, .. } => Some(data.as_slice()),
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotAuthorized.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::not_found("Goal").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::invalid_field("title", "too short").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_validation_body_carries_data() {
        let response = AppError::invalid_field("email", "Please enter valid email").error_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Validation failed: Please enter valid email in email.");
        assert_eq!(body["data"][0]["field"], "email");
    }

    #[actix_web::test]
    async fn test_plain_error_has_no_data() {
        let response = AppError::not_found("Reminder").error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Reminder not found");
        assert!(body.get("data").is_none());
    }
}
