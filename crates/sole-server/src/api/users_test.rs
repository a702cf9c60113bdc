use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::api::test_support::{send, test_app};

async fn register(app: &axum::Router, username: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        Some(json!({"username": username, "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().expect("user id").to_string()
}

#[tokio::test]
async fn register_hides_credentials_and_rejects_duplicates() {
    let app = test_app("http://127.0.0.1:9");
    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({"username": "kicksfan", "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["username"], "kicksfan");
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({"username": "KicksFan", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn session_login_whoami_logout() {
    let app = test_app("http://127.0.0.1:9");
    let user_id = register(&app, "kicksfan").await;

    let (status, body) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let (status, _) = send(
        &app,
        "POST",
        "/api/session",
        Some(json!({"username": "kicksfan", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/session",
        Some(json!({"username": "kicksfan", "password": "hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user_id.as_str());

    let (_, body) = send(&app, "GET", "/api/session", None).await;
    assert_eq!(body["data"]["id"], user_id.as_str());

    let (status, _) = send(&app, "DELETE", "/api/session", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = send(&app, "GET", "/api/session", None).await;
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn shoe_size_and_like_toggle() {
    let app = test_app("http://127.0.0.1:9");
    let user_id = register(&app, "kicksfan").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{user_id}/shoe-size"),
        Some(json!({"size": "10.5"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shoeSize"], "10.5");

    let uri = format!("/api/users/{user_id}/likes/nike-dunk-low-panda");
    let (_, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(body["data"], json!({"styleID": "nike-dunk-low-panda", "liked": true}));
    let (_, body) = send(&app, "POST", &uri, None).await;
    assert_eq!(body["data"]["liked"], false);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = test_app("http://127.0.0.1:9");
    let (status, _) = send(&app, "POST", "/api/users/ghost/likes/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/api/users/ghost/likes", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_likes_enriches_from_goat_then_stockx() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/goat/products"))
        .and(query_param("slugs", "air-jordan-1-chicago"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 1,
                "slug": "air-jordan-1-chicago",
                "name": "Air Jordan 1 Chicago",
                "image_url": "https://images.example.com/aj1.png"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/goat/products"))
        .and(query_param("slugs", "stockx-only"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "missing"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/stockx/products/stockx-only"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "sx", "slug": "stockx-only", "title": "Yeezy Slide Onyx"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/goat/products"))
        .and(query_param("slugs", "vanished"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/stockx/products/vanished"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let app = test_app(&server.uri());
    let user_id = register(&app, "collector").await;
    for style_id in ["air-jordan-1-chicago", "stockx-only", "vanished"] {
        send(
            &app,
            "POST",
            &format!("/api/users/{user_id}/likes/{style_id}"),
            None,
        )
        .await;
    }

    let (status, body) = send(&app, "GET", &format!("/api/users/{user_id}/likes"), None).await;
    assert_eq!(status, StatusCode::OK);

    let mut found: Vec<(String, String)> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .map(|s| {
            (
                s["styleID"].as_str().unwrap_or_default().to_string(),
                s["source"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    found.sort();
    assert_eq!(
        found,
        vec![
            ("air-jordan-1-chicago".to_string(), "goat".to_string()),
            ("stockx-only".to_string(), "stockx".to_string()),
        ]
    );
}
