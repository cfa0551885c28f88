use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::error::AppResult;
use crate::model::{Actor, Film, FilmPatch, FilmSort};

use super::{actor_from_row, db_err, film_from_row, ACTOR_COLUMNS, FILM_COLUMNS};

#[derive(Clone)]
pub struct FilmStorage {
    db: SqlitePool,
}

impl FilmStorage {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a film and link the given actors inside one transaction.
    /// Returns the persisted film with the linked actors attached. Actor ids
    /// must already be validated for existence by the caller.
    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        release_date: NaiveDate,
        rating: u8,
        actor_ids: &[i64],
    ) -> AppResult<Film> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| db_err("failed to start transaction while creating film", e))?;

        let query = format!(
            "INSERT INTO films (title, description, release_date, rating)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {FILM_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(title)
            .bind(description)
            .bind(release_date)
            .bind(rating as i64)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| db_err("failed to create a film", e))?;
        let mut film = film_from_row(&row)?;

        link_actors(&mut *tx, film.id, actor_ids).await?;
        film.actors = actors_of_film(&mut *tx, film.id).await?;

        tx.commit()
            .await
            .map_err(|e| db_err("failed to commit transaction while creating film", e))?;

        Ok(film)
    }

    /// Apply a partial update; unset fields keep their stored value via
    /// COALESCE, and an empty RETURNING set is the not-found signal. When
    /// `actor_ids` is present the linked actor set is replaced wholesale.
    /// Everything runs in one transaction.
    pub async fn update(&self, id: i64, patch: &FilmPatch) -> AppResult<Option<Film>> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| db_err("failed to start transaction while updating film", e))?;

        let query = format!(
            "UPDATE films
             SET title = COALESCE(?1, title),
                 description = COALESCE(?2, description),
                 release_date = COALESCE(?3, release_date),
                 rating = COALESCE(?4, rating)
             WHERE id = ?5
             RETURNING {FILM_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(patch.title.as_deref())
            .bind(patch.description.as_deref())
            .bind(patch.release_date)
            .bind(patch.rating.map(|r| r as i64))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_err("failed to update a film", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut film = film_from_row(&row)?;

        if let Some(actor_ids) = &patch.actor_ids {
            sqlx::query("DELETE FROM films_actors WHERE film_id = ?1")
                .bind(film.id)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_err("failed to update a film", e))?;
            link_actors(&mut *tx, film.id, actor_ids).await?;
        }
        film.actors = actors_of_film(&mut *tx, film.id).await?;

        tx.commit()
            .await
            .map_err(|e| db_err("failed to commit transaction while updating film", e))?;

        Ok(Some(film))
    }

    /// Delete by id. `false` means no row matched. The join rows cascade;
    /// actors are never touched.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM films WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| db_err("failed to delete film", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Page over films ordered by the allow-listed sort pairs (in the order
    /// given; `rating DESC` when none are given), then fold the joined actor
    /// rows into one film each.
    pub async fn list_with_sort(
        &self,
        sort: &[FilmSort],
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Film>> {
        let inner_order = order_by_clause(sort, "");
        let outer_order = order_by_clause(sort, "f.");
        let query = format!(
            "SELECT f.id AS film_id,
                    f.title AS film_title,
                    f.description AS film_description,
                    f.release_date AS film_release_date,
                    f.rating AS film_rating,
                    a.id AS actor_id,
                    a.name AS actor_name,
                    a.sex AS actor_sex,
                    a.birthdate AS actor_birthdate
             FROM (SELECT * FROM films ORDER BY {inner_order}, id LIMIT ?1 OFFSET ?2) AS f
             LEFT JOIN films_actors AS fa ON fa.film_id = f.id
             LEFT JOIN actors AS a ON a.id = fa.actor_id
             ORDER BY {outer_order}, f.id, a.id"
        );

        let rows = sqlx::query(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(|e| db_err("failed to list films", e))?;

        fold_film_rows(&rows)
    }

    /// Case-sensitive substring search over film title and actor name. Empty
    /// patterns match everything, so two empty filters degrade to a plain
    /// paged listing.
    pub async fn search_by_filters(
        &self,
        title: &str,
        actor_name: &str,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Film>> {
        let rows = sqlx::query(
            r#"SELECT f.id AS film_id,
                      f.title AS film_title,
                      f.description AS film_description,
                      f.release_date AS film_release_date,
                      f.rating AS film_rating,
                      a.id AS actor_id,
                      a.name AS actor_name,
                      a.sex AS actor_sex,
                      a.birthdate AS actor_birthdate
               FROM (SELECT * FROM films
                     WHERE id IN (SELECT f2.id
                                  FROM films AS f2
                                  INNER JOIN films_actors AS fa2 ON fa2.film_id = f2.id
                                  INNER JOIN actors AS a2 ON a2.id = fa2.actor_id
                                  WHERE f2.title LIKE '%' || ?1 || '%'
                                    AND a2.name LIKE '%' || ?2 || '%')
                     ORDER BY id LIMIT ?3 OFFSET ?4) AS f
               LEFT JOIN films_actors AS fa ON fa.film_id = f.id
               LEFT JOIN actors AS a ON a.id = fa.actor_id
               ORDER BY f.id, a.id"#,
        )
        .bind(title)
        .bind(actor_name)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(|e| db_err("failed to search films", e))?;

        fold_film_rows(&rows)
    }
}

/// Build an ORDER BY fragment from the allow-listed sort pairs. Field and
/// direction come from closed enums, so the fragment is injection-free by
/// construction.
fn order_by_clause(sort: &[FilmSort], prefix: &str) -> String {
    if sort.is_empty() {
        return format!("{prefix}rating DESC");
    }
    sort.iter()
        .map(|s| format!("{prefix}{} {}", s.field.column(), s.dir.keyword()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Group joined rows by film id (adjacent thanks to the ORDER BY) into films
/// with accumulated actor lists.
fn fold_film_rows(rows: &[SqliteRow]) -> AppResult<Vec<Film>> {
    let mut films: Vec<Film> = Vec::new();
    for row in rows {
        let film_id: i64 = row.try_get("film_id").map_err(|e| db_err("failed to list films", e))?;
        if films.last().map(|f| f.id) != Some(film_id) {
            films.push(film_from_row(row)?);
        }
        let actor_id: Option<i64> =
            row.try_get("actor_id").map_err(|e| db_err("failed to list films", e))?;
        if let (Some(_), Some(current)) = (actor_id, films.last_mut()) {
            current.actors.push(actor_from_row(row)?);
        }
    }
    Ok(films)
}

async fn link_actors(tx: &mut SqliteConnection, film_id: i64, actor_ids: &[i64]) -> AppResult<()> {
    let mut unique: Vec<i64> = actor_ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    for actor_id in unique {
        sqlx::query("INSERT INTO films_actors (film_id, actor_id) VALUES (?1, ?2)")
            .bind(film_id)
            .bind(actor_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_err("failed to link film actors", e))?;
    }
    Ok(())
}

async fn actors_of_film(tx: &mut SqliteConnection, film_id: i64) -> AppResult<Vec<Actor>> {
    let query = format!(
        "SELECT {ACTOR_COLUMNS}
         FROM actors
         WHERE id IN (SELECT actor_id FROM films_actors WHERE film_id = ?1)
         ORDER BY id"
    );
    let rows = sqlx::query(&query)
        .bind(film_id)
        .fetch_all(tx)
        .await
        .map_err(|e| db_err("failed to get film actors", e))?;
    rows.iter().map(actor_from_row).collect()
}
