use axum::extract::FromRequest;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::model::{Actor, Film, FilmSort, Sex, SortDir, SortField};

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const DEFAULT_LIST_OFFSET: i64 = 0;

// ---------- Response envelope ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// The uniform `{status, payload}` wrapper around every API response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: ResponseStatus,
    pub payload: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(payload: T) -> Self {
        Self { status: ResponseStatus::Ok, payload }
    }

    pub fn error(payload: T) -> Self {
        Self { status: ResponseStatus::Error, payload }
    }
}

/// Payload of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

/// JSON body extractor whose rejection is rendered through the envelope
/// instead of axum's plain-text default.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

// ---------- Response views ----------

/// Film as it appears nested inside an actor (no actor list).
#[derive(Debug, Serialize)]
pub struct FilmRef {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rating: u8,
}

impl From<Film> for FilmRef {
    fn from(film: Film) -> Self {
        Self {
            id: film.id,
            title: film.title,
            description: film.description.unwrap_or_default(),
            release_date: film.release_date,
            rating: film.rating,
        }
    }
}

/// Actor as it appears nested inside a film (no film list).
#[derive(Debug, Serialize)]
pub struct ActorRef {
    pub id: i64,
    pub name: String,
    pub sex: Sex,
    pub birthdate: NaiveDate,
}

impl From<Actor> for ActorRef {
    fn from(actor: Actor) -> Self {
        Self { id: actor.id, name: actor.name, sex: actor.sex, birthdate: actor.birthdate }
    }
}

#[derive(Debug, Serialize)]
pub struct ActorView {
    pub id: i64,
    pub name: String,
    pub sex: Sex,
    pub birthdate: NaiveDate,
    pub films: Vec<FilmRef>,
}

impl From<Actor> for ActorView {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id,
            name: actor.name,
            sex: actor.sex,
            birthdate: actor.birthdate,
            films: actor.films.into_iter().map(FilmRef::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilmView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rating: u8,
    pub actors: Vec<ActorRef>,
}

impl From<Film> for FilmView {
    fn from(film: Film) -> Self {
        Self {
            id: film.id,
            title: film.title,
            description: film.description.unwrap_or_default(),
            release_date: film.release_date,
            rating: film.rating,
            actors: film.actors.into_iter().map(ActorRef::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActorsListResponse {
    pub actors: Vec<ActorView>,
}

#[derive(Debug, Serialize)]
pub struct FilmsListResponse {
    pub films: Vec<FilmView>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ---------- Request bodies ----------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateActorRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters long"))]
    pub name: String,
    pub sex: Sex,
    pub birthdate: NaiveDate,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateActorRequest {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters long"))]
    pub name: Option<String>,
    pub sex: Option<Sex>,
    pub birthdate: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFilmRequest {
    #[validate(length(min = 1, max = 150, message = "must be between 1 and 150 characters long"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters long"))]
    pub description: Option<String>,
    pub release_date: NaiveDate,
    #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
    pub rating: u8,
    #[validate(length(min = 1, message = "must contain at least one actor id"))]
    pub actor_ids: Vec<i64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFilmRequest {
    #[validate(length(min = 1, max = 150, message = "must be between 1 and 150 characters long"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters long"))]
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
    pub rating: Option<u8>,
    #[validate(length(min = 1, message = "must contain at least one actor id"))]
    pub actor_ids: Option<Vec<i64>>,
}

// ---------- Query parameters ----------

/// `limit`/`offset` for the actor listing. Kept as raw strings so malformed
/// values surface as envelope-wrapped validation errors, not extractor
/// rejections.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListFilmsQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchFilmsQuery {
    #[serde(rename = "film-title")]
    pub film_title: Option<String>,
    #[serde(rename = "actor-name")]
    pub actor_name: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Parse an optional non-negative integer query parameter, falling back to
/// `default` when absent.
pub fn parse_page_param(raw: Option<&str>, field: &str, default: i64) -> AppResult<i64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: i64 = raw.parse().map_err(|_| AppError::ValidationError {
        field: field.to_string(),
        message: format!("'{raw}' is not a valid integer"),
    })?;
    if value < 0 {
        return Err(AppError::ValidationError {
            field: field.to_string(),
            message: "must not be negative".to_string(),
        });
    }
    Ok(value)
}

/// Parse the `sort` mini-grammar: comma-separated `field:direction` pairs
/// over the allow-listed fields. The sequence of pairs is preserved. An
/// absent or empty parameter yields no sort (the storage layer then applies
/// its `rating DESC` default).
pub fn parse_sort(raw: Option<&str>) -> AppResult<Vec<FilmSort>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let mut sorts = Vec::new();
    for pair in raw.split(',') {
        let Some((field, dir)) = pair.split_once(':') else {
            return Err(sort_error(format!(
                "malformed sort pair '{pair}', expected 'field:direction' like 'rating:desc'"
            )));
        };
        let field = match field {
            "title" => SortField::Title,
            "release-date" => SortField::ReleaseDate,
            "rating" => SortField::Rating,
            other => return Err(sort_error(format!("unexpected sort field '{other}'"))),
        };
        let dir = match dir {
            "asc" => SortDir::Asc,
            "desc" => SortDir::Desc,
            other => return Err(sort_error(format!("unexpected sort direction '{other}'"))),
        };
        sorts.push(FilmSort { field, dir });
    }
    Ok(sorts)
}

fn sort_error(message: String) -> AppError {
    AppError::ValidationError { field: "sort".to_string(), message }
}

/// Parse a path id; anything but an integer is a request error.
pub fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse().map_err(|_| AppError::ValidationError {
        field: "id".to_string(),
        message: format!("'{raw}' is not a valid id"),
    })
}
