#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::error::AppError;
    use crate::model::{ActorPatch, FilmPatch, Sex};
    use crate::service::{ActorService, FilmService};
    use crate::storage::{ActorStorage, FilmStorage};
    use crate::tests::support;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (ActorService, FilmService, FilmStorage) {
        let pool = support::test_pool().await;
        let actor_storage = ActorStorage::new(pool.clone());
        let film_storage = FilmStorage::new(pool.clone());
        (
            ActorService::new(actor_storage.clone()),
            FilmService::new(film_storage.clone(), actor_storage),
            film_storage,
        )
    }

    #[tokio::test]
    async fn test_actor_absence_becomes_not_found() {
        let (actors, _, _) = setup().await;

        let err = actors.update(4711, &ActorPatch::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "got {err}");
        assert_eq!(err.to_string(), "Not found: actor not found");

        let err = actors.delete(4711).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "got {err}");
    }

    #[tokio::test]
    async fn test_film_absence_becomes_not_found() {
        let (_, films, _) = setup().await;

        let err = films.update(4711, &FilmPatch::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Not found: film not found");

        let err = films.delete(4711).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "got {err}");
    }

    #[tokio::test]
    async fn test_film_create_gates_on_actor_existence() {
        let (actors, films, film_storage) = setup().await;
        let known = actors.create("Known", Sex::Male, date(1980, 1, 1)).await.unwrap();

        let err = films
            .create("Orphan", None, date(2020, 1, 1), 5, &[known.id, 999])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not found: actors not found");

        // The gate fails before any write: no film row was persisted.
        let listed = film_storage.list_with_sort(&[], 100, 0).await.unwrap();
        assert!(listed.is_empty());

        // With every id known the creation goes through.
        let film = films.create("Kept", None, date(2020, 1, 1), 5, &[known.id]).await.unwrap();
        assert_eq!(film.actors.len(), 1);
    }

    #[tokio::test]
    async fn test_film_update_gates_on_actor_existence() {
        let (actors, films, _) = setup().await;
        let known = actors.create("Known", Sex::Female, date(1980, 1, 1)).await.unwrap();
        let film = films.create("Stable", None, date(2020, 1, 1), 5, &[known.id]).await.unwrap();

        let patch = FilmPatch { rating: Some(9), actor_ids: Some(vec![999]), ..Default::default() };
        let err = films.update(film.id, &patch).await.unwrap_err();
        assert_eq!(err.to_string(), "Not found: actors not found");

        // The failed gate left the film untouched.
        let listed = films.list_with_sort(&[], 100, 0).await.unwrap();
        assert_eq!(listed[0].rating, 5);
        assert_eq!(listed[0].actors.len(), 1);
    }
}
