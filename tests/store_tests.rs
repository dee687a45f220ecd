use chrono::Utc;
use vibecheck::db::Store;
use vibecheck::entities::{shares, users};
use vibecheck::models::content::{Album, Difficulty, Game, Location, MediaKind, Movie};

async fn test_store() -> Store {
    Store::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store")
}

fn sample_movie(id: &str, director: &str) -> Movie {
    Movie {
        id: id.to_string(),
        title: "Inception".to_string(),
        year: 2010,
        director: director.to_string(),
        poster: None,
        season: None,
        episode: None,
        kind: MediaKind::Movie,
        url: Some(format!("https://www.themoviedb.org/movie/{id}")),
    }
}

fn sample_game(id: &str, title: &str, platform: &str, difficulty: Option<Difficulty>) -> Game {
    Game {
        id: id.to_string(),
        title: title.to_string(),
        platform: platform.to_string(),
        cover: None,
        difficulty,
        url: None,
    }
}

fn sample_user(email: &str, username: &str) -> users::Model {
    let now = Utc::now().to_rfc3339();
    users::Model {
        user_id: format!("u_{username}"),
        email: email.to_string(),
        username: username.to_string(),
        password_hash: "argon2-hash-placeholder".to_string(),
        avatar: None,
        bio: None,
        aura_colors: None,
        aesthetic_tags: None,
        created_at: now.clone(),
        updated_at: now,
    }
}

#[tokio::test]
async fn upsert_is_idempotent_and_keeps_latest_values() {
    let store = test_store().await;

    store
        .upsert_movie(&sample_movie("27205", "C. Nolan"))
        .await
        .unwrap();
    store
        .upsert_movie(&sample_movie("27205", "Christopher Nolan"))
        .await
        .unwrap();

    let (movies, total) = store.list_movies(None, None, 20, 0).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].director, "Christopher Nolan");

    let fetched = store.get_movie("27205").await.unwrap().unwrap();
    assert_eq!(fetched.year, 2010);
    assert_eq!(fetched.kind, MediaKind::Movie);
}

#[tokio::test]
async fn missing_difficulty_round_trips_as_none() {
    let store = test_store().await;

    store
        .upsert_game(&sample_game("3498", "GTA V", "PC", None))
        .await
        .unwrap();

    let game = store.get_game("3498").await.unwrap().unwrap();
    assert_eq!(game.difficulty, None);
}

#[tokio::test]
async fn game_listing_filters() {
    let store = test_store().await;

    store
        .upsert_game(&sample_game("1", "Celeste", "Nintendo Switch", Some(Difficulty::Hard)))
        .await
        .unwrap();
    store
        .upsert_game(&sample_game("2", "Stardew Valley", "PC", Some(Difficulty::Easy)))
        .await
        .unwrap();
    store
        .upsert_game(&sample_game("3", "Hades", "PC", Some(Difficulty::Hard)))
        .await
        .unwrap();

    let (games, total) = store
        .list_games(None, Some(Difficulty::Hard), 20, 0)
        .await
        .unwrap();
    assert_eq!(total, 2);
    let titles: Vec<&str> = games.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, ["Celeste", "Hades"]);

    // platform filter is a substring match
    let (games, total) = store
        .list_games(Some("Switch"), None, 20, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(games[0].title, "Celeste");
}

#[tokio::test]
async fn album_search_matches_artist() {
    let store = test_store().await;

    store
        .upsert_album(&Album {
            id: "302127".to_string(),
            title: "Discovery".to_string(),
            artist: "Daft Punk".to_string(),
            cover: None,
            duration: Some(3660),
            url: None,
        })
        .await
        .unwrap();

    let by_title = store.search_albums("disco", 10).await.unwrap();
    assert_eq!(by_title.len(), 1);

    let by_artist = store.search_albums("daft", 10).await.unwrap();
    assert_eq!(by_artist.len(), 1);

    let no_match = store.search_albums("aphex", 10).await.unwrap();
    assert!(no_match.is_empty());
}

#[tokio::test]
async fn movie_search_matches_director() {
    let store = test_store().await;

    store
        .upsert_movie(&sample_movie("27205", "Christopher Nolan"))
        .await
        .unwrap();

    let by_title = store.search_movies("incep", 10).await.unwrap();
    assert_eq!(by_title.len(), 1);

    let by_director = store.search_movies("nolan", 10).await.unwrap();
    assert_eq!(by_director.len(), 1);

    let no_match = store.search_movies("villeneuve", 10).await.unwrap();
    assert!(no_match.is_empty());
}

#[tokio::test]
async fn location_search_matches_city() {
    let store = test_store().await;

    store
        .upsert_location(&Location {
            id: "q2044".to_string(),
            name: "Eiffel Tower".to_string(),
            city: "Paris".to_string(),
            country: "France".to_string(),
            image: None,
            weather: None,
            temperature: None,
            timezone: Some("Europe/Paris".to_string()),
            url: None,
        })
        .await
        .unwrap();

    let by_name = store.search_locations("eiffel", 10).await.unwrap();
    assert_eq!(by_name.len(), 1);

    let by_city = store.search_locations("paris", 10).await.unwrap();
    assert_eq!(by_city.len(), 1);

    let by_country = store.search_locations("france", 10).await.unwrap();
    assert_eq!(by_country.len(), 1);

    assert!(store.search_locations("tokyo", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() {
    let store = test_store().await;

    store
        .create_user(sample_user("ada@example.com", "ada"))
        .await
        .unwrap();

    let err = store
        .create_user(sample_user("ada@example.com", "ada2"))
        .await
        .expect_err("duplicate email must be rejected");

    let db_err = err
        .downcast_ref::<sea_orm::DbErr>()
        .expect("expected a database error");
    assert!(matches!(
        db_err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn share_counts_group_by_category() {
    let store = test_store().await;
    store
        .create_user(sample_user("ada@example.com", "ada"))
        .await
        .unwrap();

    for (id, category) in [("s_1", "cinema"), ("s_2", "cinema"), ("s_3", "travel")] {
        store
            .create_share(shares::Model {
                id: id.to_string(),
                user_id: "u_ada".to_string(),
                category: category.to_string(),
                content_id: "x1".to_string(),
                title: "A share".to_string(),
                image: None,
                dominant_color: None,
                caption: None,
                created_at: Utc::now().to_rfc3339(),
            })
            .await
            .unwrap();
    }

    let mut counts = store.share_category_counts("u_ada").await.unwrap();
    counts.sort();
    assert_eq!(
        counts,
        vec![("cinema".to_string(), 2), ("travel".to_string(), 1)]
    );

    let recent = store.recent_shares("u_ada", 2).await.unwrap();
    assert_eq!(recent.len(), 2);

    // another user's shares are invisible
    assert!(store.share_category_counts("u_bob").await.unwrap().is_empty());
}
