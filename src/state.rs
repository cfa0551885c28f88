use std::sync::Arc;

use crate::config::AppConfig;
use crate::service::{ActorService, AuthService, FilmService};
use crate::storage::{ActorStorage, FilmStorage, UserStorage};

/// The shared application state.
///
/// Cheaply cloneable: the pool is internally reference-counted and the
/// services only hold pool handles. Beyond the pool there is no shared
/// mutable state; every request runs synchronously end-to-end.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: sqlx::SqlitePool,
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Actor CRUD operations.
    pub actors: ActorService,
    /// Film CRUD, listing and search operations.
    pub films: FilmService,
    /// Credential verification for the Basic-auth extractor.
    pub auth: AuthService,
}

impl AppState {
    /// Wire storages into services around the given pool.
    pub fn new(db: sqlx::SqlitePool, config: AppConfig) -> Self {
        let actor_storage = ActorStorage::new(db.clone());
        let film_storage = FilmStorage::new(db.clone());
        let user_storage = UserStorage::new(db.clone());

        let actors = ActorService::new(actor_storage.clone());
        let films = FilmService::new(film_storage, actor_storage);
        let auth = AuthService::new(user_storage);

        Self { db, config: Arc::new(config), actors, films, auth }
    }
}
