//! SQL storage adapters for the catalog.
//!
//! Each adapter owns a pool handle and translates domain calls into SQL
//! against the `actors`, `films`, `films_actors` and `users` tables.
//! Absence is reported as `Option`/`bool`, never as a generic error; the
//! service layer decides what absence means.

pub mod actors;
pub mod films;
pub mod users;

pub use actors::ActorStorage;
pub use films::FilmStorage;
pub use users::UserStorage;

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::{AppError, AppResult};
use crate::model::{Actor, Film, Sex};

pub(crate) fn db_err(context: &str, err: sqlx::Error) -> AppError {
    AppError::Database(format!("{}: {}", context, err))
}

/// Decode an actor from a row carrying `actor_*`-aliased columns.
pub(crate) fn actor_from_row(row: &SqliteRow) -> AppResult<Actor> {
    let sex_code: i64 =
        row.try_get("actor_sex").map_err(|e| db_err("failed to decode actor row", e))?;
    let sex = Sex::from_code(sex_code)
        .ok_or_else(|| AppError::Database(format!("unknown sex code '{}' in actors table", sex_code)))?;
    Ok(Actor {
        id: row.try_get("actor_id").map_err(|e| db_err("failed to decode actor row", e))?,
        name: row.try_get("actor_name").map_err(|e| db_err("failed to decode actor row", e))?,
        sex,
        birthdate: row
            .try_get("actor_birthdate")
            .map_err(|e| db_err("failed to decode actor row", e))?,
        films: Vec::new(),
    })
}

/// Decode a film from a row carrying `film_*`-aliased columns.
pub(crate) fn film_from_row(row: &SqliteRow) -> AppResult<Film> {
    let rating: i64 =
        row.try_get("film_rating").map_err(|e| db_err("failed to decode film row", e))?;
    let rating = u8::try_from(rating)
        .map_err(|_| AppError::Database(format!("rating '{}' out of range in films table", rating)))?;
    Ok(Film {
        id: row.try_get("film_id").map_err(|e| db_err("failed to decode film row", e))?,
        title: row.try_get("film_title").map_err(|e| db_err("failed to decode film row", e))?,
        description: row
            .try_get("film_description")
            .map_err(|e| db_err("failed to decode film row", e))?,
        release_date: row
            .try_get("film_release_date")
            .map_err(|e| db_err("failed to decode film row", e))?,
        rating,
        actors: Vec::new(),
    })
}

/// Column list for a bare `films` row, aliased for [`film_from_row`].
pub(crate) const FILM_COLUMNS: &str = "id AS film_id, title AS film_title, \
     description AS film_description, release_date AS film_release_date, rating AS film_rating";

/// Column list for a bare `actors` row, aliased for [`actor_from_row`].
pub(crate) const ACTOR_COLUMNS: &str =
    "id AS actor_id, name AS actor_name, sex AS actor_sex, birthdate AS actor_birthdate";
