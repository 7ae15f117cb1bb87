use validator::{Validate, ValidationErrors};

use super::error::{AppError, FieldError};

/// Validates a request body, turning field failures into a 422 `AppError`.
pub fn validate_request<T: Validate>(request: &T) -> Result<(), AppError> {
    request.validate().map_err(into_app_error)
}

fn into_app_error(errors: ValidationErrors) -> AppError {
    let mut data: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, failures)| {
            let field = field.to_string();
            failures.iter().map(move |failure| FieldError {
                field: field.clone(),
                message: failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", failure.code)),
            })
        })
        .collect();
    data.sort_by(|a, b| a.field.cmp(&b.field));

    let mut message = String::from("Validation failed, check entered data.");
    for failure in &data {
        message.push_str(&format!(" {} in {}.", failure.message, failure.field));
    }

    AppError::validation(message, data)
}

/// Trims an optional string in place.
pub fn trim_opt(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        let trimmed = v.trim();
        if trimmed.len() != v.len() {
            *v = trimmed.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 5, message = "Must be at least 5 characters"))]
        title: String,
        #[validate(email(message = "Please enter valid email"))]
        email: String,
    }

    #[test]
    fn test_valid_request_passes() {
        let sample = Sample {
            title: "Run a marathon".into(),
            email: "a@b.com".into(),
        };
        assert!(validate_request(&sample).is_ok());
    }

    #[test]
    fn test_failures_are_collected_and_sorted() {
        let sample = Sample {
            title: "Run".into(),
            email: "nope".into(),
        };

        match validate_request(&sample) {
            Err(AppError::Validation { message, data }) => {
                assert_eq!(data.len(), 2);
                assert_eq!(data[0].field, "email");
                assert_eq!(data[1].field, "title");
                assert!(message.contains("Please enter valid email in email."));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_trim_opt() {
        let mut value = Some("  hello ".to_string());
        trim_opt(&mut value);
        assert_eq!(value.as_deref(), Some("hello"));

        let mut none: Option<String> = None;
        trim_opt(&mut none);
        assert!(none.is_none());
    }
}
