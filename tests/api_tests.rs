use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use vibecheck::api::AppState;
use vibecheck::config::Config;
use vibecheck::models::content::{MediaKind, Movie};
use vibecheck::state::SharedState;

const TEST_PASSWORD: &str = "Sup3rSecret";

async fn spawn_app() -> Router {
    spawn_app_with_state().await.0
}

/// Like `spawn_app`, but also hands back the state so tests can seed the
/// cache directly.
async fn spawn_app_with_state() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.auth.jwt_secret = "test-secret".to_string();

    let shared = SharedState::new(config)
        .await
        .expect("Failed to create app state");
    let state = Arc::new(AppState {
        shared: Arc::new(shared),
    });
    (vibecheck::api::router(state.clone()), state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn put_json(uri: &str, token: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Registers a user and returns (token, user_id).
async fn register_user(app: &Router, email: &str, username: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/register",
            &json!({
                "email": email,
                "username": username,
                "password": TEST_PASSWORD,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["userId"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let response = app.oneshot(get("/api/v1/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "VibeCheck API");
}

#[tokio::test]
async fn test_register_and_login() {
    let app = spawn_app().await;
    let (_, user_id) = register_user(&app, "ada@example.com", "ada").await;
    assert!(user_id.starts_with("u_"));

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            &json!({"email": "ada@example.com", "password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["username"], "ada");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = spawn_app().await;
    register_user(&app, "ada@example.com", "ada").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            &json!({"email": "ada@example.com", "password": "WrongPass1"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["message"], "Invalid email or password");

    // unknown email yields the identical response
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            &json!({"email": "nobody@example.com", "password": TEST_PASSWORD}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = spawn_app().await;
    register_user(&app, "ada@example.com", "ada").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/register",
            &json!({
                "email": "ada@example.com",
                "username": "other",
                "password": TEST_PASSWORD,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Conflict");
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let cases = [
        (
            json!({"email": "ada@example.com", "username": "ada", "password": "weak"}),
            "Password must be at least 8 characters long",
        ),
        (
            json!({"email": "ada@example.com", "username": "ada", "password": "alllowercase1"}),
            "Password must contain at least one uppercase letter",
        ),
        (
            json!({"email": "ada@example.com", "username": "ab", "password": TEST_PASSWORD}),
            "Username must be between 3 and 20 characters",
        ),
        (
            json!({"email": "not-an-email", "username": "ada", "password": TEST_PASSWORD}),
            "Invalid email format",
        ),
        (
            json!({"username": "ada", "password": TEST_PASSWORD}),
            "Email is required",
        ),
    ];

    for (payload, expected) in cases {
        let response = app
            .clone()
            .oneshot(post_json("/api/v1/auth/register", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["message"], expected, "payload: {payload}");
    }
}

#[tokio::test]
async fn test_profile_requires_auth() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/users/profile"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(authed_get("/api/v1/users/profile", "garbage-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update() {
    let app = spawn_app().await;
    let (token, user_id) = register_user(&app, "ada@example.com", "ada").await;

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/v1/users/profile",
            &token,
            &json!({"bio": "counting machines", "avatar": "https://example.com/a.png"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bio"], "counting machines");

    // the public lookup sees the update
    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/users/{user_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bio"], "counting machines");
}

#[tokio::test]
async fn test_profile_null_clears_field() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "ada@example.com", "ada").await;

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/v1/users/profile",
            &token,
            &json!({"bio": "counting machines", "avatar": "https://example.com/a.png"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // an absent field stays as-is, an explicit null clears it
    let response = app
        .clone()
        .oneshot(put_json("/api/v1/users/profile", &token, &json!({"bio": null})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["bio"], Value::Null);
    assert_eq!(body["avatar"], "https://example.com/a.png");

    // an empty update touches nothing
    let response = app
        .clone()
        .oneshot(put_json("/api/v1/users/profile", &token, &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["avatar"], "https://example.com/a.png");
}

#[tokio::test]
async fn test_profile_bio_too_long() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "ada@example.com", "ada").await;

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/v1/users/profile",
            &token,
            &json!({"bio": "x".repeat(501)}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Bio must be 500 characters or less");
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let app = spawn_app().await;

    let response = app
        .oneshot(get("/api/v1/users/u_000000000000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_share_lifecycle_and_aura_breakdown() {
    let app = spawn_app().await;
    let (token, user_id) = register_user(&app, "ada@example.com", "ada").await;

    for (category, content_id) in [("cinema", "27205"), ("cinema", "155"), ("music", "302127")] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/aura/shares")
                    .header("Content-Type", "application/json")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::from(
                        json!({"category": category, "contentId": content_id}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(body["id"].as_str().unwrap().starts_with("s_"));
        assert_eq!(body["category"], category);
    }

    // the aura profile aggregates the shares
    let response = app
        .clone()
        .oneshot(get(&format!("/api/v1/aura/profile/{user_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["recentShares"].as_array().unwrap().len(), 3);
    let top = body["topCategories"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["category"], "cinema");
    assert_eq!(top[0]["count"], 2);
    assert!((top[0]["percentage"].as_f64().unwrap() - 66.7).abs() < 1e-9);
    assert!((top[1]["percentage"].as_f64().unwrap() - 33.3).abs() < 1e-9);

    // shares list is newest first and paginated
    let response = app
        .clone()
        .oneshot(authed_get("/api/v1/aura/shares?limit=2", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 3);
    assert_eq!(body["limit"], 2);
}

#[tokio::test]
async fn test_share_default_title() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "ada@example.com", "ada").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/aura/shares")
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::from(
                    json!({"category": "books", "contentId": "OL27448W"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Books - OL27448W");
}

#[tokio::test]
async fn test_share_invalid_category() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "ada@example.com", "ada").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/aura/shares")
                .header("Content-Type", "application/json")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::from(
                    json!({"category": "podcasts", "contentId": "x1"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Category must be one of: cinema, music, games, books, travel"
    );
}

#[tokio::test]
async fn test_aura_color_validation() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "ada@example.com", "ada").await;

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/v1/aura/profile",
            &token,
            &json!({"auraColors": ["#AABBCC", "#001122"], "aestheticTags": ["vaporwave"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["auraColors"], json!(["#AABBCC", "#001122"]));
    assert_eq!(body["aestheticTags"], json!(["vaporwave"]));

    for bad in ["#ZZZZZZ", "AABBCC", "#AAB"] {
        let response = app
            .clone()
            .oneshot(put_json(
                "/api/v1/aura/profile",
                &token,
                &json!({"auraColors": [bad]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "color: {bad}");
    }
}

#[tokio::test]
async fn test_aura_null_clears_lists() {
    let app = spawn_app().await;
    let (token, _) = register_user(&app, "ada@example.com", "ada").await;

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/v1/aura/profile",
            &token,
            &json!({"auraColors": ["#AABBCC"], "aestheticTags": ["vaporwave"]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(put_json(
            "/api/v1/aura/profile",
            &token,
            &json!({"auraColors": null}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["auraColors"], json!([]));
    assert_eq!(body["aestheticTags"], json!(["vaporwave"]));
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].as_str().is_some());

    // a missing body gets the same envelope, not a bare rejection
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn test_cached_content_listing() {
    let app = spawn_app().await;

    // no search term, nothing cached: an empty page, not an error
    let response = app
        .clone()
        .oneshot(get("/api/v1/content/movies"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["total"], 0);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);
}

#[tokio::test]
async fn test_pagination_normalization() {
    let app = spawn_app().await;

    // clamped to limits
    let response = app
        .clone()
        .oneshot(get("/api/v1/content/albums?limit=500&offset=-5"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["limit"], 100);
    assert_eq!(body["offset"], 0);

    let response = app
        .clone()
        .oneshot(get("/api/v1/content/albums?limit=0"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["limit"], 1);

    // any non-numeric value resets the whole pair
    let response = app
        .clone()
        .oneshot(get("/api/v1/content/albums?limit=abc&offset=40"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);
}

#[tokio::test]
async fn test_invalid_content_filters() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/content/movies?type=documentary"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Type must be 'movie' or 'tv'");

    let response = app
        .clone()
        .oneshot(get("/api/v1/content/games?difficulty=Impossible"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Difficulty must be 'Easy', 'Medium' or 'Hard'");
}

#[tokio::test]
async fn test_global_search_requires_query() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(get("/api/v1/search")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Query parameter is required");
}

#[tokio::test]
async fn test_global_search_honors_limit() {
    let (app, state) = spawn_app_with_state().await;

    for (id, title) in [
        ("27205", "Inception"),
        ("27206", "Inception 2"),
        ("27207", "Inception 3"),
    ] {
        state
            .store()
            .upsert_movie(&Movie {
                id: id.to_string(),
                title: title.to_string(),
                year: 2010,
                director: "Christopher Nolan".to_string(),
                poster: None,
                season: None,
                episode: None,
                kind: MediaKind::Movie,
                url: None,
            })
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get("/api/v1/search?query=inception&categories=cinema&limit=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(body["total"], 2);

    // without the parameter every match comes back (default cap is 20)
    let response = app
        .clone()
        .oneshot(get("/api/v1/search?query=inception&categories=cinema"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 3);

    // a non-numeric limit falls back to the default instead of failing
    let response = app
        .clone()
        .oneshot(get("/api/v1/search?query=inception&categories=cinema&limit=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_global_search_over_cache() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/v1/search?query=inception&categories=cinema,music"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["query"], "inception");
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["total"], 0);
}
