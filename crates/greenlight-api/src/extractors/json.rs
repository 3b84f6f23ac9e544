//! `ValidatedJson` extractor: JSON body deserialization plus field validation.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use greenlight_core::error::AppError;

use crate::error::ApiError;

/// A JSON body that deserialized cleanly and passed `Validate`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

/// Flattens validator output into a `Validation` error with one message per field.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut details = serde_json::Map::new();
    for (field, field_errors) in errors.field_errors() {
        let message = field_errors
            .first()
            .map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("is invalid ({})", e.code),
            })
            .unwrap_or_else(|| "is invalid".to_string());
        details.insert(field.to_string(), serde_json::Value::String(message));
    }

    AppError::validation("the request body failed validation")
        .with_details(serde_json::Value::Object(details))
}
