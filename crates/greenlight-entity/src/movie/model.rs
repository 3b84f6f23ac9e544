//! Movie entity model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::versioned::Versioned;

/// A catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Movie {
    /// Unique movie identifier.
    pub id: i64,
    /// When the row was created.
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
    /// Title.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Running time in minutes, rendered as `"<n> mins"`.
    #[serde(with = "super::runtime")]
    pub runtime: i32,
    /// Genre tags.
    pub genres: Vec<String>,
    /// Optimistic concurrency version.
    pub version: i32,
}

impl Versioned for Movie {
    const RESOURCE: &'static str = "movie";

    fn id(&self) -> i64 {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn set_version(&mut self, version: i32) {
        self.version = version;
    }
}

/// Data required to create a movie.
#[derive(Debug, Clone)]
pub struct NewMovie {
    /// Title.
    pub title: String,
    /// Release year.
    pub year: i32,
    /// Running time in minutes.
    pub runtime: i32,
    /// Genre tags.
    pub genres: Vec<String>,
}
