use chrono::NaiveDate;
use sqlx::{QueryBuilder, Row, SqliteConnection, SqlitePool};

use crate::error::AppResult;
use crate::model::{Actor, ActorPatch, Film, Sex};

use super::{actor_from_row, db_err, film_from_row, ACTOR_COLUMNS, FILM_COLUMNS};

#[derive(Clone)]
pub struct ActorStorage {
    db: SqlitePool,
}

impl ActorStorage {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a new actor and return the persisted row with an empty film list.
    pub async fn create(&self, name: &str, sex: Sex, birthdate: NaiveDate) -> AppResult<Actor> {
        let query = format!(
            "INSERT INTO actors (name, sex, birthdate)
             VALUES (?1, ?2, ?3)
             RETURNING {ACTOR_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(name)
            .bind(sex.code() as i64)
            .bind(birthdate)
            .fetch_one(&self.db)
            .await
            .map_err(|e| db_err("failed to create an actor", e))?;
        actor_from_row(&row)
    }

    /// Apply a partial update. Unset fields keep their stored value via
    /// COALESCE; an empty RETURNING set is the not-found signal, so no
    /// separate existence probe is needed. Returns the updated actor with
    /// its film list, fetched in the same transaction.
    pub async fn update(&self, id: i64, patch: &ActorPatch) -> AppResult<Option<Actor>> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(|e| db_err("failed to start transaction while updating actor", e))?;

        let query = format!(
            "UPDATE actors
             SET name = COALESCE(?1, name),
                 sex = COALESCE(?2, sex),
                 birthdate = COALESCE(?3, birthdate)
             WHERE id = ?4
             RETURNING {ACTOR_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(patch.name.as_deref())
            .bind(patch.sex.map(|s| s.code() as i64))
            .bind(patch.birthdate)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_err("failed to update actor", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut actor = actor_from_row(&row)?;
        actor.films = films_of_actor(&mut *tx, actor.id).await?;

        tx.commit()
            .await
            .map_err(|e| db_err("failed to commit transaction while updating actor", e))?;

        Ok(Some(actor))
    }

    /// Delete by id. `false` means no row matched.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM actors WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| db_err("failed to delete actor", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Page over actors (ordered by id) and fold the joined film rows into
    /// one actor each. The LEFT JOIN keeps actors without films in the
    /// result, with an empty film list.
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Actor>> {
        let rows = sqlx::query(
            r#"SELECT a.id AS actor_id,
                      a.name AS actor_name,
                      a.sex AS actor_sex,
                      a.birthdate AS actor_birthdate,
                      f.id AS film_id,
                      f.title AS film_title,
                      f.description AS film_description,
                      f.release_date AS film_release_date,
                      f.rating AS film_rating
               FROM (SELECT * FROM actors ORDER BY id LIMIT ?1 OFFSET ?2) AS a
               LEFT JOIN films_actors AS fa ON fa.actor_id = a.id
               LEFT JOIN films AS f ON f.id = fa.film_id
               ORDER BY a.id, f.id"#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(|e| db_err("failed to list actors", e))?;

        let mut actors: Vec<Actor> = Vec::new();
        for row in &rows {
            let actor_id: i64 =
                row.try_get("actor_id").map_err(|e| db_err("failed to list actors", e))?;
            if actors.last().map(|a| a.id) != Some(actor_id) {
                actors.push(actor_from_row(row)?);
            }
            let film_id: Option<i64> =
                row.try_get("film_id").map_err(|e| db_err("failed to list actors", e))?;
            // fold: rows sharing the actor id accumulate onto the last entry
            if let (Some(_), Some(current)) = (film_id, actors.last_mut()) {
                current.films.push(film_from_row(row)?);
            }
        }

        Ok(actors)
    }

    /// Check that every id in the set refers to an existing actor. Duplicates
    /// are collapsed first; an empty set means "no actors requested" and
    /// passes (rejecting it is request validation's job).
    pub async fn are_exists(&self, ids: &[i64]) -> AppResult<bool> {
        let mut unique: Vec<i64> = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();
        if unique.is_empty() {
            return Ok(true);
        }

        let mut qb = QueryBuilder::new("SELECT COUNT(*) AS cnt FROM actors WHERE id IN (");
        {
            let mut separated = qb.separated(", ");
            for id in &unique {
                separated.push_bind(*id);
            }
        }
        qb.push(")");

        let row = qb
            .build()
            .fetch_one(&self.db)
            .await
            .map_err(|e| db_err("failed to check whether actors exist", e))?;
        let count: i64 =
            row.try_get("cnt").map_err(|e| db_err("failed to check whether actors exist", e))?;

        Ok(count == unique.len() as i64)
    }
}

async fn films_of_actor(conn: &mut SqliteConnection, actor_id: i64) -> AppResult<Vec<Film>> {
    let query = format!(
        "SELECT {FILM_COLUMNS}
         FROM films
         WHERE id IN (SELECT film_id FROM films_actors WHERE actor_id = ?1)
         ORDER BY id"
    );
    let rows = sqlx::query(&query)
        .bind(actor_id)
        .fetch_all(conn)
        .await
        .map_err(|e| db_err("failed to get actor films", e))?;
    rows.iter().map(film_from_row).collect()
}
