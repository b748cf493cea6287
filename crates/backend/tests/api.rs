//! HTTP-level tests against a backend bound to an ephemeral port.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use backend::{start, AppState, RunningBackend};

const ORIGIN: &str = "http://localhost:3000";

async fn spawn() -> RunningBackend {
    start("127.0.0.1:0", AppState::new(), ORIGIN, std::future::pending())
        .await
        .unwrap()
}

async fn login(client: &Client, base: &str, username: &str, password: &str) -> String {
    let body: Value = client
        .post(format!("{base}/auth/login"))
        .json(&json!({"username": username, "password": password}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let server = spawn().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", server.base_url()))
        .json(&json!({"username": "admin", "password": "admin123", "clientInfo": {"platform": "linux"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"], json!({"id": 1, "username": "admin", "email": "admin@example.com"}));
}

#[tokio::test]
async fn test_bad_credentials_are_401_with_message() {
    let server = spawn().await;

    let response = Client::new()
        .post(format!("{}/auth/login", server.base_url()))
        .json(&json!({"username": "admin", "password": "nope"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_query_routes_require_a_known_token() {
    let server = spawn().await;
    let client = Client::new();
    let url = format!("{}/query/categories", server.base_url());

    let missing = client.get(&url).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let unknown = client.get(&url).bearer_auth("forged").send().await.unwrap();
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_returns_token_owner() {
    let server = spawn().await;
    let client = Client::new();
    let token = login(&client, &server.base_url(), "user", "user123").await;

    let body: Value = client
        .get(format!("{}/auth/profile", server.base_url()))
        .bearer_auth(token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["username"], "user");
    assert_eq!(body["id"], 2);
}

#[tokio::test]
async fn test_lookups_are_bare_arrays() {
    let server = spawn().await;
    let client = Client::new();
    let token = login(&client, &server.base_url(), "admin", "admin123").await;

    let types: Value = client
        .get(format!("{}/query/types", server.base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(types, json!(["内部", "外部"]));
}

#[tokio::test]
async fn test_search_filters_by_query_params() {
    let server = spawn().await;
    let client = Client::new();
    let token = login(&client, &server.base_url(), "admin", "admin123").await;

    let found: Value = client
        .get(format!("{}/query/search", server.base_url()))
        .query(&[("category", "开发"), ("type", "外部")])
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "项目D");
    assert_eq!(found[0]["createdAt"], "2024-01-20");
}

#[tokio::test]
async fn test_test_data_rejects_and_appends() {
    let server = spawn().await;
    let client = Client::new();
    let token = login(&client, &server.base_url(), "admin", "admin123").await;
    let url = format!("{}/query/test-data", server.base_url());

    let rejected = client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({"num": 99}))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    let body: Value = rejected.json().await.unwrap();
    assert_eq!(body["message"], "num must be 100");

    let accepted = client
        .post(&url)
        .bearer_auth(&token)
        .json(&json!({"num": 100}))
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::CREATED);
    let snapshot: Value = accepted.json().await.unwrap();
    assert_eq!(snapshot.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_cors_preflight_admits_frontend_origin() {
    let server = spawn().await;

    let response = Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/query/search", server.base_url()))
        .header("Origin", ORIGIN)
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "authorization,x-request-id")
        .send()
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], ORIGIN);
    assert_eq!(headers["access-control-allow-credentials"], "true");
}
