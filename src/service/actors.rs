use chrono::NaiveDate;

use crate::error::{AppError, AppResult, OptionExt};
use crate::model::{Actor, ActorPatch, Sex};
use crate::storage::ActorStorage;

#[derive(Clone)]
pub struct ActorService {
    storage: ActorStorage,
}

impl ActorService {
    pub fn new(storage: ActorStorage) -> Self {
        Self { storage }
    }

    pub async fn create(&self, name: &str, sex: Sex, birthdate: NaiveDate) -> AppResult<Actor> {
        tracing::info!(name, "creating an actor");
        let actor = self.storage.create(name, sex, birthdate).await?;
        tracing::info!(id = actor.id, "actor created");
        Ok(actor)
    }

    /// Partial update; absence is reported by the storage's atomic statement
    /// and mapped to a not-found condition here.
    pub async fn update(&self, id: i64, patch: &ActorPatch) -> AppResult<Actor> {
        tracing::info!(id, "updating an actor");
        self.storage.update(id, patch).await?.ok_or_not_found("actor")
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        tracing::info!(id, "deleting an actor");
        if !self.storage.delete(id).await? {
            return Err(AppError::NotFound("actor not found".to_string()));
        }
        Ok(())
    }

    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Actor>> {
        tracing::debug!(limit, offset, "listing actors");
        self.storage.list(limit, offset).await
    }
}
