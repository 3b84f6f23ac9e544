//! Movie handlers. Writes go through the optimistic concurrency guard.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};

use greenlight_core::error::AppError;
use greenlight_database::bounded;
use greenlight_entity::NewMovie;

use crate::dto::request::{CreateMovieRequest, UpdateMovieRequest, validate_movie};
use crate::dto::response::{MessageResponse, MovieEnvelope};
use crate::error::ApiResult;
use crate::extractors::json::validation_error;
use crate::extractors::{ValidatedJson, parse_id};
use crate::state::AppState;

/// POST /v1/movies
pub async fn create_movie(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateMovieRequest>,
) -> ApiResult<(StatusCode, HeaderMap, Json<MovieEnvelope>)> {
    let new_movie = NewMovie {
        title: req.title,
        year: req.year,
        runtime: req.runtime,
        genres: req.genres,
    };
    let movie = bounded(
        state.config.database.query_timeout(),
        "insert movie",
        state.stores.movies.insert(&new_movie),
    )
    .await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/v1/movies/{}", movie.id))
        .map_err(|e| AppError::internal(format!("Invalid Location header: {e}")))?;
    headers.insert(LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(MovieEnvelope { movie })))
}

/// GET /v1/movies/{id}
pub async fn show_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MovieEnvelope>> {
    let movie = state.movie_guard.load(parse_id(&id)?).await?;
    Ok(Json(MovieEnvelope { movie }))
}

/// PATCH /v1/movies/{id}
///
/// A `version` in the body must equal the stored version; a concurrent
/// writer that got there first turns this into 409.
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateMovieRequest>,
) -> ApiResult<Json<MovieEnvelope>> {
    let mut movie = state.movie_guard.load(parse_id(&id)?).await?;

    if let Some(expected) = req.version {
        if expected != movie.version {
            return Err(AppError::edit_conflict(format!(
                "movie {} is at version {}, not {expected}; re-read and retry",
                movie.id, movie.version
            ))
            .into());
        }
    }

    if let Some(title) = req.title {
        movie.title = title;
    }
    if let Some(year) = req.year {
        movie.year = year;
    }
    if let Some(runtime) = req.runtime {
        movie.runtime = runtime;
    }
    if let Some(genres) = req.genres {
        movie.genres = genres;
    }
    validate_movie(&movie.title, movie.year, movie.runtime, &movie.genres)
        .map_err(validation_error)?;

    state.movie_guard.update(&mut movie).await?;
    Ok(Json(MovieEnvelope { movie }))
}

/// DELETE /v1/movies/{id}
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.movie_guard.delete(parse_id(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "movie successfully deleted".to_string(),
    }))
}
