use chrono::NaiveDate;

use crate::error::{AppError, AppResult, OptionExt};
use crate::model::{Film, FilmPatch, FilmSort};
use crate::storage::{ActorStorage, FilmStorage};

#[derive(Clone)]
pub struct FilmService {
    storage: FilmStorage,
    actors: ActorStorage,
}

impl FilmService {
    pub fn new(storage: FilmStorage, actors: ActorStorage) -> Self {
        Self { storage, actors }
    }

    /// Create a film. Every referenced actor id must exist; a missing id
    /// fails the whole operation before any write happens.
    pub async fn create(
        &self,
        title: &str,
        description: Option<&str>,
        release_date: NaiveDate,
        rating: u8,
        actor_ids: &[i64],
    ) -> AppResult<Film> {
        tracing::info!(title, ?actor_ids, "creating a film");
        if !self.actors.are_exists(actor_ids).await? {
            tracing::warn!(?actor_ids, "film creation references unknown actors");
            return Err(AppError::NotFound("actors not found".to_string()));
        }
        let film = self.storage.create(title, description, release_date, rating, actor_ids).await?;
        tracing::info!(id = film.id, "film created");
        Ok(film)
    }

    /// Partial update. When the patch carries actor ids, they are gated on
    /// existence exactly like at creation.
    pub async fn update(&self, id: i64, patch: &FilmPatch) -> AppResult<Film> {
        tracing::info!(id, "updating a film");
        if let Some(actor_ids) = &patch.actor_ids {
            if !self.actors.are_exists(actor_ids).await? {
                tracing::warn!(?actor_ids, "film update references unknown actors");
                return Err(AppError::NotFound("actors not found".to_string()));
            }
        }
        self.storage.update(id, patch).await?.ok_or_not_found("film")
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        tracing::info!(id, "deleting a film");
        if !self.storage.delete(id).await? {
            return Err(AppError::NotFound("film not found".to_string()));
        }
        Ok(())
    }

    pub async fn list_with_sort(
        &self,
        sort: &[FilmSort],
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Film>> {
        tracing::debug!(limit, offset, "listing films");
        self.storage.list_with_sort(sort, limit, offset).await
    }

    pub async fn search_by_filters(
        &self,
        title: &str,
        actor_name: &str,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Film>> {
        tracing::debug!(title, actor_name, "searching films");
        self.storage.search_by_filters(title, actor_name, limit, offset).await
    }
}
