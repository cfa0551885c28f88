#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::model::{ActorPatch, FilmPatch, FilmSort, Sex, SortDir, SortField};
    use crate::storage::{ActorStorage, FilmStorage, UserStorage};
    use crate::tests::support;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup() -> (ActorStorage, FilmStorage, UserStorage) {
        let pool = support::test_pool().await;
        (
            ActorStorage::new(pool.clone()),
            FilmStorage::new(pool.clone()),
            UserStorage::new(pool),
        )
    }

    #[tokio::test]
    async fn test_actor_create_returns_persisted_row() {
        let (actors, _, _) = setup().await;

        let actor = actors.create("Greta", Sex::Female, date(1955, 9, 28)).await.unwrap();

        assert!(actor.id > 0);
        assert_eq!(actor.name, "Greta");
        assert_eq!(actor.sex, Sex::Female);
        assert_eq!(actor.birthdate, date(1955, 9, 28));
        assert!(actor.films.is_empty());
    }

    #[tokio::test]
    async fn test_actor_update_coalesce_preserves_unset_fields() {
        let (actors, _, _) = setup().await;
        let actor = actors.create("Before", Sex::Male, date(1970, 1, 1)).await.unwrap();

        let patch = ActorPatch { name: Some("After".to_string()), ..Default::default() };
        let updated = actors.update(actor.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.name, "After");
        assert_eq!(updated.sex, Sex::Male);
        assert_eq!(updated.birthdate, date(1970, 1, 1));

        // A patch with nothing set leaves the row untouched.
        let unchanged = actors.update(actor.id, &ActorPatch::default()).await.unwrap().unwrap();
        assert_eq!(unchanged.name, "After");
        assert_eq!(unchanged.sex, Sex::Male);
        assert_eq!(unchanged.birthdate, date(1970, 1, 1));
    }

    #[tokio::test]
    async fn test_actor_update_and_delete_signal_absence() {
        let (actors, _, _) = setup().await;

        let missing = actors.update(4711, &ActorPatch::default()).await.unwrap();
        assert!(missing.is_none());

        let actor = actors.create("Brief", Sex::Unknown, date(1990, 1, 1)).await.unwrap();
        assert!(actors.delete(actor.id).await.unwrap());
        assert!(!actors.delete(actor.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_actor_list_folds_films_and_keeps_filmless_actors() {
        let (actors, films, _) = setup().await;
        let starred = actors.create("Starred", Sex::Male, date(1980, 1, 1)).await.unwrap();
        let idle = actors.create("Idle", Sex::Female, date(1985, 1, 1)).await.unwrap();
        films
            .create("First", None, date(2001, 1, 1), 7, &[starred.id])
            .await
            .unwrap();
        films
            .create("Second", Some("sequel"), date(2003, 1, 1), 6, &[starred.id])
            .await
            .unwrap();

        let listed = actors.list(100, 0).await.unwrap();

        assert_eq!(listed.len(), 2);
        let by_id = |id: i64| listed.iter().find(|a| a.id == id).unwrap();
        let titles: Vec<&str> = by_id(starred.id).films.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert!(by_id(idle.id).films.is_empty());
    }

    #[tokio::test]
    async fn test_actor_list_paginates_over_actors_not_joined_rows() {
        let (actors, films, _) = setup().await;
        let busy = actors.create("Busy", Sex::Male, date(1980, 1, 1)).await.unwrap();
        let second = actors.create("Second", Sex::Female, date(1981, 1, 1)).await.unwrap();
        films.create("A", None, date(2000, 1, 1), 5, &[busy.id]).await.unwrap();
        films.create("B", None, date(2001, 1, 1), 5, &[busy.id]).await.unwrap();
        films.create("C", None, date(2002, 1, 1), 5, &[busy.id]).await.unwrap();

        // The first page is one actor with all three films, not three rows.
        let page = actors.list(1, 0).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, busy.id);
        assert_eq!(page[0].films.len(), 3);

        let page = actors.list(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, second.id);
    }

    #[tokio::test]
    async fn test_are_exists() {
        let (actors, _, _) = setup().await;
        let a = actors.create("A", Sex::Unknown, date(1990, 1, 1)).await.unwrap();
        let b = actors.create("B", Sex::Unknown, date(1991, 1, 1)).await.unwrap();

        assert!(actors.are_exists(&[a.id, b.id]).await.unwrap());
        assert!(actors.are_exists(&[a.id, a.id]).await.unwrap(), "duplicates collapse");
        assert!(!actors.are_exists(&[a.id, 999]).await.unwrap());
        // An empty set means "no actors requested".
        assert!(actors.are_exists(&[]).await.unwrap());
    }

    #[tokio::test]
    async fn test_film_create_links_actors_in_one_transaction() {
        let (actors, films, _) = setup().await;
        let a1 = actors.create("One", Sex::Male, date(1980, 1, 1)).await.unwrap();
        let a2 = actors.create("Two", Sex::Female, date(1981, 1, 1)).await.unwrap();

        let film = films
            .create("Pair", Some("two leads"), date(2010, 3, 3), 8, &[a2.id, a1.id])
            .await
            .unwrap();

        assert_eq!(film.title, "Pair");
        assert_eq!(film.description.as_deref(), Some("two leads"));
        assert_eq!(film.rating, 8);
        let ids: Vec<i64> = film.actors.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![a1.id, a2.id]);
    }

    #[tokio::test]
    async fn test_film_update_patch_and_cast_replacement() {
        let (actors, films, _) = setup().await;
        let a1 = actors.create("One", Sex::Male, date(1980, 1, 1)).await.unwrap();
        let a2 = actors.create("Two", Sex::Female, date(1981, 1, 1)).await.unwrap();
        let film = films.create("Cut", None, date(2015, 5, 5), 5, &[a1.id]).await.unwrap();

        let patch = FilmPatch { rating: Some(9), ..Default::default() };
        let updated = films.update(film.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.rating, 9);
        assert_eq!(updated.title, "Cut");
        assert_eq!(updated.release_date, date(2015, 5, 5));
        assert_eq!(updated.actors.len(), 1);

        let patch = FilmPatch { actor_ids: Some(vec![a2.id]), ..Default::default() };
        let updated = films.update(film.id, &patch).await.unwrap().unwrap();
        let ids: Vec<i64> = updated.actors.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![a2.id]);

        assert!(films.update(4711, &FilmPatch::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_film_delete_cascades_links_only() {
        let (actors, films, _) = setup().await;
        let a = actors.create("Kept", Sex::Male, date(1980, 1, 1)).await.unwrap();
        let film = films.create("Gone", None, date(2000, 1, 1), 5, &[a.id]).await.unwrap();

        assert!(films.delete(film.id).await.unwrap());
        assert!(!films.delete(film.id).await.unwrap());

        // The actor survives, now without films.
        let listed = actors.list(10, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].films.is_empty());
    }

    #[tokio::test]
    async fn test_list_with_sort_default_and_sequence() {
        let (actors, films, _) = setup().await;
        let a = actors.create("Any", Sex::Unknown, date(1990, 1, 1)).await.unwrap();
        films.create("Alpha", None, date(2001, 1, 1), 5, &[a.id]).await.unwrap();
        films.create("Beta", None, date(2002, 1, 1), 5, &[a.id]).await.unwrap();
        films.create("Gamma", None, date(2003, 1, 1), 2, &[a.id]).await.unwrap();

        // No sort given: rating descending.
        let listed = films.list_with_sort(&[], 100, 0).await.unwrap();
        let ratings: Vec<u8> = listed.iter().map(|f| f.rating).collect();
        assert_eq!(ratings, vec![5, 5, 2]);

        // The pair sequence is significant: rating ascending first, then
        // title descending as the tie-breaker.
        let sort = [
            FilmSort { field: SortField::Rating, dir: SortDir::Asc },
            FilmSort { field: SortField::Title, dir: SortDir::Desc },
        ];
        let listed = films.list_with_sort(&sort, 100, 0).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["Gamma", "Beta", "Alpha"]);

        let listed = films.list_with_sort(&sort, 2, 1).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["Beta", "Alpha"]);
    }

    #[tokio::test]
    async fn test_search_is_case_sensitive_substring_match() {
        let (actors, films, _) = setup().await;
        let a = actors.create("Marlene", Sex::Female, date(1901, 12, 27)).await.unwrap();
        films.create("Blue Angel", None, date(1930, 4, 1), 9, &[a.id]).await.unwrap();

        let hits = films.search_by_filters("Angel", "", 100, 0).await.unwrap();
        assert_eq!(hits.len(), 1);

        let hits = films.search_by_filters("angel", "", 100, 0).await.unwrap();
        assert!(hits.is_empty(), "LIKE must be case-sensitive");

        let hits = films.search_by_filters("", "arlen", 100, 0).await.unwrap();
        assert_eq!(hits.len(), 1);

        let hits = films.search_by_filters("Angel", "Nobody", 100, 0).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_with_empty_filters_pages_all_films() {
        let (actors, films, _) = setup().await;
        let a = actors.create("Any", Sex::Unknown, date(1990, 1, 1)).await.unwrap();
        for (title, rating) in [("A", 1), ("B", 2), ("C", 3)] {
            films.create(title, None, date(2000, 1, 1), rating, &[a.id]).await.unwrap();
        }

        let hits = films.search_by_filters("", "", 2, 1).await.unwrap();
        let titles: Vec<&str> = hits.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_user_lookup_by_email() {
        let pool = support::test_pool().await;
        let users = UserStorage::new(pool.clone());
        support::seed_user(&pool, "reader@example.com", "secret", "user").await;

        let user = users.find_by_email("reader@example.com").await.unwrap().unwrap();
        assert_eq!(user.email, "reader@example.com");
        assert_eq!(user.role, crate::model::Role::User);
        assert!(user.password_hash.starts_with("$argon2id$"));

        assert!(users.find_by_email("ghost@example.com").await.unwrap().is_none());
    }
}
