//! API integration tests
//!
//! Run against a live server started with the bootstrap admin from
//! `.env.example`: `cargo test -- --ignored`

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const ADMIN_EMAIL: &str = "admin@courtside.local";
const ADMIN_PASSWORD: &str = "change-me";

/// Helper to get an admin token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

fn unique_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}@example.com", prefix, nanos)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_admin_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_signup_then_login_requires_verification() {
    let client = Client::new();
    let email = unique_email("player");

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret123",
            "full_name": "Test Player"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.get("code").is_none());

    let duplicate = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret123",
            "full_name": "Test Player"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let login = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(login.status(), StatusCode::FORBIDDEN);

    let wrong_code = client
        .post(format!("{}/auth/verify-otp", BASE_URL))
        .json(&json!({ "email": email, "code": "000000" }))
        .send()
        .await
        .expect("Failed to send request");
    // one in a million chance of guessing right
    assert_eq!(wrong_code.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_signup_validation() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "email": "not-an-email",
            "password": "123",
            "full_name": "X"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_public_venue_listing() {
    let client = Client::new();

    let response = client
        .get(format!("{}/venues?per_page=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert_eq!(body["per_page"], 5);
    assert!(body["items"].as_array().unwrap().len() <= 5);
}

#[tokio::test]
#[ignore]
async fn test_incomplete_venue_is_hidden() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    // Admins may create venues; a bare venue is pending and incomplete
    let response = client
        .post(format!("{}/owner/venues", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": "Bare Hall" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["approval_status"], "PENDING");
    assert_eq!(body["validation"]["is_complete"], false);
    assert_eq!(body["validation"]["has_name"], true);
    let id = body["id"].as_i64().unwrap();

    let approve = client
        .put(format!("{}/admin/venues/{}/approve", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(approve.status().is_success());

    // Approved but still incomplete
    let public = client
        .get(format!("{}/venues/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(public.status(), StatusCode::NOT_FOUND);

    let validation = client
        .get(format!("{}/admin/venues/{}/validation", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let details: Value = validation.json().await.expect("Failed to parse response");
    assert_eq!(details["is_approved"], true);
    assert_eq!(details["has_courts"], false);
    assert!(details["failed_checks"]
        .as_array()
        .unwrap()
        .contains(&json!("has_photos")));
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    for path in ["/auth/me", "/bookings", "/owner/venues", "/admin/stats"] {
        let response = client
            .get(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_booking_status_not_found() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/bookings/999999999/status", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_admin_stats() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .get(format!("{}/admin/stats", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["users"]["total"].as_i64().unwrap() >= 1);
    assert!(body["bookings"]["by_key"]["CANCELLED"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_admin_cannot_ban_self() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let id = me["id"].as_i64().unwrap();

    let response = client
        .put(format!("{}/admin/users/{}/ban", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
