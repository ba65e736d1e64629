//! Router-level tests against the in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use questkeep_server::{build_router, App, AppState};

fn app() -> App {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    build_router(AppState::in_memory(), false)
}

async fn send(app: &App, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_raw(app: &App, method: Method, uri: &str, raw: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw.to_owned()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_user(app: &App, wallet: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/users",
        Some(json!({"wallet_address": wallet, "username": "john"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

fn sword(owner: &str) -> Value {
    json!({
        "item_id": "sword_of_truth",
        "owner_wallet": owner,
        "name": "Sword of Truth",
        "description": "A legendary sword with immense power.",
        "attributes": {"damage": 100, "durability": 50},
        "image_url": "https://example.com/items/sword.png",
        "metadata_uri": "https://metadata.example.com/items/sword.json"
    })
}

fn treasure_hunt(creator: &str) -> Value {
    json!({
        "creator_wallet": creator,
        "title": "Treasure Hunt",
        "description": "Find the hidden treasure",
        "location": "Central Park",
        "longitude": -73.9654,
        "latitude": 40.7829,
        "time_window": {
            "start_time": "2024-01-01T00:00:00Z",
            "end_time": "2024-01-02T00:00:00Z"
        },
        "rewards": {"experience_points": 100, "items": ["sword_of_truth"]}
    })
}

#[tokio::test]
async fn health_reports_memory_store() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn user_lifecycle() {
    let app = app();

    let created = create_user(&app, "0xabc").await;
    assert_eq!(created["wallet_address"], "0xabc");
    assert_eq!(created["username"], "john");
    assert_eq!(created["experience_points"], 0);
    assert_eq!(created["level"], 1);
    assert!(created["created_at"].is_string());
    assert!(created["updated_at"].is_null());

    let (status, fetched) = send(&app, Method::GET, "/users/0xabc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, listed) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/users/0xabc",
        Some(json!({"level": 5, "email": "john@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["level"], 5);
    assert_eq!(updated["email"], "john@example.com");
    assert_eq!(updated["username"], "john");
    assert_eq!(updated["created_at"], created["created_at"]);
    assert!(updated["updated_at"].is_string());

    let (status, cleared) = send(
        &app,
        Method::PUT,
        "/users/0xabc",
        Some(json!({"username": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["username"].is_null());
    assert_eq!(cleared["email"], "john@example.com");

    let (status, body) = send(&app, Method::DELETE, "/users/0xabc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"detail": "User deleted successfully"}));

    let (status, body) = send(&app, Method::GET, "/users/0xabc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = send(&app, Method::DELETE, "/users/0xabc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_update_changes_only_updated_at() {
    let app = app();
    let created = create_user(&app, "0xabc").await;

    let (status, updated) = send(&app, Method::PUT, "/users/0xabc", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = created.clone();
    expected["updated_at"] = updated["updated_at"].clone();
    assert!(updated["updated_at"].is_string());
    assert_eq!(updated, expected);
}

#[tokio::test]
async fn duplicate_user_is_rejected() {
    let app = app();
    create_user(&app, "0xabc").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"wallet_address": "0xabc", "username": "someone else"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "already_exists");

    let (_, fetched) = send(&app, Method::GET, "/users/0xabc", None).await;
    assert_eq!(fetched["username"], "john");
}

#[tokio::test]
async fn update_of_missing_user_creates_nothing() {
    let app = app();
    let (status, _) = send(&app, Method::PUT, "/users/0xghost", Some(json!({"level": 2}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/users/0xghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, listed) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn bad_requests_are_validation_errors() {
    let app = app();

    let (status, body) = send_raw(&app, Method::POST, "/users", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(&app, Method::POST, "/users", Some(json!({"username": "john"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"wallet_address": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let too_long = format!("/users/{}", "w".repeat(129));
    let (status, body) = send(&app, Method::GET, &too_long, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(&app, Method::GET, "/users/%FF", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().starts_with("invalid path"), "{body}");

    let (status, body) = send(&app, Method::GET, "/quests/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn trailing_slash_paths_are_accepted() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/users/",
        Some(json!({"wallet_address": "0xabc"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");

    let (status, listed) = send(&app, Method::GET, "/users/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));

    let (status, _) = send(&app, Method::GET, "/users/0xabc/", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::POST, "/items/", Some(sword("0xabc"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::POST, "/quests/", Some(treasure_hunt("0xabc"))).await;
    assert_eq!(status, StatusCode::OK);

    let payload = json!({
        "wallet_address": "0xabc",
        "equipped_items": [],
        "cosmetic_details": {},
        "preferences": {}
    });
    let (status, _) = send(&app, Method::POST, "/avatars/", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn free_form_keys_round_trip() {
    let app = app();

    for (wallet, path) in [
        ("john doe", "/users/john%20doe"),
        ("alice@example.com", "/users/alice@example.com"),
    ] {
        let created = create_user(&app, wallet).await;
        assert_eq!(created["wallet_address"], wallet);

        let (status, fetched) = send(&app, Method::GET, path, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    let mut payload = sword("john doe");
    payload["item_id"] = json!("sword of truth");
    let (status, item) = send(&app, Method::POST, "/items", Some(payload)).await;
    assert_eq!(status, StatusCode::OK, "{item}");
    let (status, _) = send(&app, Method::GET, "/items/sword%20of%20truth", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn item_lifecycle_with_image_data() {
    let app = app();
    create_user(&app, "0xabc").await;

    let mut payload = sword("0xabc");
    payload["image_data"] = json!("aGVsbG8=");
    let (status, created) = send(&app, Method::POST, "/items", Some(payload)).await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["image_data"], "aGVsbG8=");
    assert_eq!(created["attributes"]["damage"], 100);

    let (status, body) = send(&app, Method::POST, "/items", Some(sword("0xabc"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "already_exists");

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/items/sword_of_truth",
        Some(json!({"name": "Blunt Sword", "image_data": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Blunt Sword");
    assert!(updated["image_data"].is_null());
    assert_eq!(updated["description"], created["description"]);

    let (status, body) = send(&app, Method::DELETE, "/items/sword_of_truth", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Item deleted successfully");

    let (status, _) = send(&app, Method::GET, "/items/sword_of_truth", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn item_rejects_invalid_base64() {
    let app = app();
    create_user(&app, "0xabc").await;

    let mut payload = sword("0xabc");
    payload["image_data"] = json!("%%%");
    let (status, body) = send(&app, Method::POST, "/items", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn missing_references_conflict() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/items", Some(sword("0xnobody"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = send(&app, Method::POST, "/quests", Some(treasure_hunt("0xnobody"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    create_user(&app, "0xabc").await;
    let (status, _) = send(&app, Method::POST, "/items", Some(sword("0xabc"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::DELETE, "/users/0xabc", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = send(&app, Method::GET, "/users/0xabc", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn avatar_lifecycle() {
    let app = app();
    create_user(&app, "0xabc").await;

    let payload = json!({
        "wallet_address": "0xabc",
        "equipped_items": ["sword_of_truth"],
        "cosmetic_details": {"hair": "red"},
        "preferences": {"theme": "dark"}
    });
    let (status, created) = send(&app, Method::POST, "/avatars", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["equipped_items"], json!(["sword_of_truth"]));
    assert!(created["updated_at"].is_null());

    let (status, _) = send(&app, Method::POST, "/avatars", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/avatars/0xabc",
        Some(json!({"equipped_items": ["shield", "helmet"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["equipped_items"], json!(["shield", "helmet"]));
    assert_eq!(updated["preferences"], json!({"theme": "dark"}));

    let (status, body) = send(&app, Method::DELETE, "/avatars/0xabc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Avatar deleted successfully");

    let (status, _) = send(&app, Method::GET, "/avatars/0xabc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quest_status_defaults_and_updates_verbatim() {
    let app = app();
    create_user(&app, "0xabc").await;
    create_user(&app, "0xdef").await;

    let (status, created) = send(&app, Method::POST, "/quests", Some(treasure_hunt("0xabc"))).await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["status"], "available");
    assert!(created["participant_wallet"].is_null());
    let id = created["quest_id"].as_str().unwrap().to_owned();

    for status_value in ["completed", "accepted"] {
        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/quests/{id}"),
            Some(json!({"status": status_value, "participant_wallet": "0xdef"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], status_value);
        assert_eq!(updated["participant_wallet"], "0xdef");
        assert_eq!(updated["title"], "Treasure Hunt");
    }

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/quests/{id}"),
        Some(json!({"status": "abandoned"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (_, listed) = send(&app, Method::GET, "/quests", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::DELETE, &format!("/quests/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Quest deleted successfully");

    let (status, _) = send(&app, Method::GET, &format!("/quests/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        Method::GET,
        "/quests/00000000-0000-4000-8000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
