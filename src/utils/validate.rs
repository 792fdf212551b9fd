//! Request body validation.
//!
//! [`ValidatedJson`] deserializes a JSON body and runs its `validator` rules,
//! collecting every failing field into one 422 response rather than stopping
//! at the first. [`Violations`] extends the same aggregation to checks that
//! have to hit the data store (referenced foreign keys must exist).

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::{AppError, FieldError};

/// Flattens `validator`'s error map into field-level messages, sorted by
/// field for stable output.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut list: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field)),
            })
        })
        .collect();
    list.sort_by(|a, b| a.field.cmp(&b.field));
    list
}

/// JSON extractor that validates the payload before the handler runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow::anyhow!("{} is required", field),
                    );
                }

                if error_msg.contains("invalid type") {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow::anyhow!("Invalid field type in request"),
                    );
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow::anyhow!("Missing 'Content-Type: application/json' header"),
                    );
                }

                AppError::new(StatusCode::BAD_REQUEST, anyhow::anyhow!("Invalid request body"))
            })?;

        value
            .validate()
            .map_err(|errors| AppError::validation(field_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Accumulates field violations across structural and data-store checks so a
/// submission reports every failure together.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldError>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves to `Ok` when nothing was collected, otherwise a 422 carrying
    /// the whole list.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct SignupDto {
        #[validate(email(message = "Email is invalid"))]
        email: String,
        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn test_every_violation_is_collected() {
        let dto = SignupDto {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            name: "".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        let fields = field_errors(&errors);

        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].field, "email");
        assert_eq!(fields[1].field, "name");
        assert_eq!(fields[2].field, "password");
        assert_eq!(fields[2].message, "Password must be at least 8 characters");
    }

    #[test]
    fn test_valid_dto_has_no_errors() {
        let dto = SignupDto {
            email: "teacher@example.com".to_string(),
            password: "longenough".to_string(),
            name: "A Teacher".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_violations_aggregate_async_checks() {
        let mut violations = Violations::new();
        assert!(violations.is_empty());

        violations.add("class_id", "Class does not exist");
        violations.add("subject_id", "Subject does not exist");

        let err = violations.into_result().unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert_eq!(err.errors[0].message, "Class does not exist");
    }

    #[test]
    fn test_empty_violations_resolve_ok() {
        assert!(Violations::new().into_result().is_ok());
    }
}
