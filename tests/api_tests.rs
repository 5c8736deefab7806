use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use roomly::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.uploads.images_path = std::env::temp_dir()
        .join("roomly-api-tests")
        .to_string_lossy()
        .into_owned();
    config
}

async fn spawn_app() -> Router {
    let state = roomly::api::create_app_state_from_config(test_config())
        .await
        .expect("Failed to create app state");
    roomly::api::router(state).await
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request_with_cookie(method: &str, uri: &str, cookie: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn register(app: &Router, email: &str) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            json!({
                "first_name": "Test",
                "last_name": "User",
                "email": email,
                "password": "Str0ng!pass"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Logs in and returns the session cookie.
async fn login(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": email, "password": "Str0ng!pass" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();

    set_cookie.split(';').next().unwrap().to_string()
}

/// Registers, logs in, and promotes the user to property owner.
async fn login_as_owner(app: &Router, email: &str) -> String {
    register(app, email).await;
    let cookie = login(app, email).await;

    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "PUT",
            "/api/users/property-owner",
            &cookie,
            json!({
                "kind": "R",
                "phone": "416-555-0199",
                "street": "Owner St",
                "number": 7,
                "postal_code": "a1b2c3",
                "city_id": 1
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    cookie
}

fn room_payload(description: &str) -> Value {
    json!({
        "room_type": "I",
        "bathroom_type": "E",
        "gender": "A",
        "description": description,
        "rent_price": 650,
        "size": 20,
        "number_of_rooms": 2,
        "street": "Main St",
        "number": 123,
        "postal_code": "a1b2c3",
        "city_id": 1
    })
}

async fn create_room(app: &Router, cookie: &str, description: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            "/api/rooms",
            cookie,
            room_payload(description),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/rooms/mine")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/rooms", room_payload("room")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_me_flow() {
    let app = spawn_app().await;

    register(&app, "ada@example.com").await;
    let cookie = login(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["is_owner"], false);
}

#[tokio::test]
async fn test_register_weak_password_creates_no_user() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            json!({
                "first_name": "Weak",
                "last_name": "Password",
                "email": "weak@example.com",
                "password": "weakpass"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "password"));

    // No row was written: a correct-looking login must not find the user.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "weak@example.com", "password": "weakpass" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = spawn_app().await;

    register(&app, "dup@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            json!({
                "first_name": "Another",
                "last_name": "User",
                "email": "dup@example.com",
                "password": "Str0ng!pass"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_non_owner_cannot_create_room() {
    let app = spawn_app().await;

    register(&app, "tenant@example.com").await;
    let cookie = login(&app, "tenant@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            "/api/rooms",
            &cookie,
            room_payload("not allowed"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "User is not a property owner");
}

#[tokio::test]
async fn test_room_create_invalid_fields_listed() {
    let app = spawn_app().await;

    let cookie = login_as_owner(&app, "owner-invalid@example.com").await;

    let mut payload = room_payload("bad numbers");
    payload["rent_price"] = json!(50);
    payload["size"] = json!(80);

    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            "/api/rooms",
            &cookie,
            payload,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"rent_price"));
    assert!(fields.contains(&"size"));
}

#[tokio::test]
async fn test_search_excludes_rented_rooms() {
    let app = spawn_app().await;

    let cookie = login_as_owner(&app, "owner-search@example.com").await;
    let room_id = create_room(&app, &cookie, "bright room near campus").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/rooms")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"].as_i64().unwrap(), room_id);
    assert_eq!(results[0]["city"], "Calgary, AB");

    // Toggle to rented: the room must vanish from public search.
    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            &format!("/api/rooms/{room_id}/availability"),
            &cookie,
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/rooms")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_filters_and_sorting() {
    let app = spawn_app().await;

    let cookie = login_as_owner(&app, "owner-filters@example.com").await;

    let mut cheap = room_payload("cheap room");
    cheap["rent_price"] = json!(400);
    let mut pricey = room_payload("pricey room");
    pricey["rent_price"] = json!(900);

    for payload in [cheap, pricey] {
        let response = app
            .clone()
            .oneshot(json_request_with_cookie(
                "POST",
                "/api/rooms",
                &cookie,
                payload,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/rooms?rent_price_min=500")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["description"], "pricey room");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/rooms?sort_by=price&sort_dir=desc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    let prices: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rent_price"].as_i64().unwrap())
        .collect();
    assert_eq!(prices, vec![900, 400]);
}

#[tokio::test]
async fn test_favorites_flow() {
    let app = spawn_app().await;

    let owner_cookie = login_as_owner(&app, "owner-fav@example.com").await;
    let room_id = create_room(&app, &owner_cookie, "favorite me").await;

    register(&app, "fan@example.com").await;
    let fan_cookie = login(&app, "fan@example.com").await;

    // Adding twice stays idempotent.
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request_with_cookie(
                "POST",
                &format!("/api/rooms/{room_id}/favorite"),
                &fan_cookie,
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/favorites")
                .header(header::COOKIE, &fan_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Favoriting a missing room is a silent no-op.
    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "POST",
            "/api/rooms/99999/favorite",
            &fan_cookie,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "DELETE",
            &format!("/api/rooms/{room_id}/favorite"),
            &fan_cookie,
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/favorites/ids")
                .header(header::COOKIE, &fan_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_swap_rejects_wrong_id_count() {
    let app = spawn_app().await;

    let cookie = login_as_owner(&app, "owner-swap@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request_with_cookie(
            "PUT",
            "/api/pictures/order",
            &cookie,
            json!({ "ids": [1], "ascending": true }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_city_endpoints() {
    let app = spawn_app().await;

    // Short query: prefix match only.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/cities?query=cal")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    let hits = body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Calgary");
    assert_eq!(hits[0]["province"], "AB");

    // Long query: substring match ("onto" sits inside both Edmonton and
    // Toronto).
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/cities?query=onto")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    let hits: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(hits, vec!["Edmonton", "Toronto"]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/cities/provinces")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    let provinces = body["data"].as_array().unwrap();
    assert_eq!(provinces.len(), 4);
    assert_eq!(provinces[0]["name"], "Alberta");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/cities/province/3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    let cities: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(cities, vec!["Mississauga", "Ottawa", "Toronto"]);
}
