//! Request DTOs with validation.

use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{Datelike, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use greenlight_auth::password::MAX_PASSWORD_BYTES;

/// Earliest year a movie may be released.
pub const EARLIEST_MOVIE_YEAR: i32 = 1888;

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn password_within_limit(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(error(
            "length",
            format!("must not be more than {MAX_PASSWORD_BYTES} bytes long"),
        ));
    }
    Ok(())
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterUserRequest {
    /// Display name.
    #[validate(length(min = 1, max = 500, message = "must be provided and at most 500 bytes long"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(
        length(min = 8, message = "must be at least 8 bytes long"),
        custom(function = "password_within_limit")
    )]
    pub password: String,
}

/// Activation request body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ActivateUserRequest {
    /// Activation token plaintext.
    #[validate(length(min = 1, message = "must be provided"))]
    pub token: String,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateTokenRequest {
    /// Login email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Plaintext password. Only the hashing ceiling is enforced; anything
    /// else that does not match is a credential failure.
    #[validate(custom(function = "password_within_limit"))]
    pub password: String,
}

/// Movie creation body.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMovieRequest {
    /// Title.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Runtime in minutes, sent as `"<n> mins"`.
    #[serde(with = "greenlight_entity::movie::runtime")]
    pub runtime: i32,
    /// Genre labels.
    pub genres: Vec<String>,
}

/// Partial movie update body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMovieRequest {
    /// New title.
    pub title: Option<String>,
    /// New release year.
    pub year: Option<i32>,
    /// New runtime, sent as `"<n> mins"`.
    #[serde(default, with = "greenlight_entity::movie::runtime::option")]
    pub runtime: Option<i32>,
    /// New genre labels.
    pub genres: Option<Vec<String>>,
    /// Version the client last read; must still be current.
    pub version: Option<i32>,
}

/// Checks the stored shape of a movie.
pub fn validate_movie(
    title: &str,
    year: i32,
    runtime: i32,
    genres: &[String],
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if title.is_empty() {
        errors.add("title", error("required", "must be provided"));
    } else if title.len() > 500 {
        errors.add("title", error("length", "must not be more than 500 bytes long"));
    }

    if year < EARLIEST_MOVIE_YEAR {
        errors.add("year", error("range", "must be greater than 1888"));
    } else if year > Utc::now().year() {
        errors.add("year", error("range", "must not be in the future"));
    }

    if runtime <= 0 {
        errors.add("runtime", error("range", "must be a positive integer"));
    }

    if genres.is_empty() {
        errors.add("genres", error("length", "must contain at least 1 genre"));
    } else if genres.len() > 5 {
        errors.add("genres", error("length", "must not contain more than 5 genres"));
    } else if genres.iter().collect::<HashSet<_>>().len() != genres.len() {
        errors.add("genres", error("unique", "must not contain duplicate values"));
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Validate for CreateMovieRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validate_movie(&self.title, self.year, self.runtime, &self.genres)
    }
}

/// Nothing to check until the update is merged onto the stored movie.
impl Validate for UpdateMovieRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}
