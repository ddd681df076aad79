//! API integration tests
//!
//! These run against a live server with a migrated database and a bootstrap
//! administrator. Run with: cargo test -- --ignored

use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

fn base_url() -> String {
    std::env::var("TOOLTRACK_TEST_URL").unwrap_or_else(|_| "http://localhost:8080/api/v1".to_string())
}

fn admin_credentials() -> (String, String) {
    (
        std::env::var("TOOLTRACK_TEST_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
        std::env::var("TOOLTRACK_TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "change-me".to_string()),
    )
}

/// Short unique suffix so repeated runs do not collide on unique fields
fn unique() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Helper to get an admin token
async fn get_auth_token(client: &Client) -> String {
    let (email, password) = admin_credentials();
    let response = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn create_worker(client: &Client, token: &str, name: &str) -> String {
    let worker_id = format!("W{}", unique());
    let response = client
        .post(format!("{}/users", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "email": format!("{}@example.com", worker_id.to_lowercase()),
            "workerId": worker_id,
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    worker_id
}

async fn create_tool(client: &Client, token: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}/tools", base_url()))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

async fn post(client: &Client, path: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}{}", base_url(), path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body: Value = response.json().await.expect("Failed to parse response");
    (status, body)
}

async fn dashboard_row(client: &Client, token: &str, qr_id: &str) -> Value {
    let rows: Vec<Value> = client
        .get(format!("{}/dashboard", base_url()))
        .query(&[("search", qr_id)])
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    rows.into_iter()
        .find(|r| r["qrId"] == qr_id)
        .expect("Tool missing from dashboard")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let (email, _) = admin_credentials();

    let response = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_admin_routes_require_token() {
    let client = Client::new();

    for path in ["/dashboard", "/history", "/users"] {
        let response = client
            .get(format!("{}{}", base_url(), path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_create_tool_validation_and_duplicate() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let qr_id = format!("QR-{}", unique());

    let response = client
        .post(format!("{}/tools", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "name": "Drill" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let tool = create_tool(&client, &token, json!({ "name": "Drill", "qrId": qr_id })).await;
    assert_eq!(tool["status"], "AVAILABLE");
    assert_eq!(tool["isCalibrationTool"], false);

    let response = client
        .post(format!("{}/tools", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "name": "Other drill", "qrId": qr_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_create_user_rules() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let worker_id = format!("W{}", unique());

    let response = client
        .post(format!("{}/users", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "name": "No Password Admin",
            "email": format!("{}@example.com", worker_id.to_lowercase()),
            "workerId": worker_id,
            "role": "ADMIN"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let existing = create_worker(&client, &token, "Dup Source").await;
    let response = client
        .post(format!("{}/users", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Duplicate",
            "email": format!("other-{}@example.com", unique()),
            "workerId": existing,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_unknown_worker_and_tool() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let worker = create_worker(&client, &token, "Lost Worker").await;

    let (status, _) = post(&client, "/checkout", json!({ "qrId": "nope", "workerId": format!("missing-{}", unique()) })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&client, "/checkout", json!({ "qrId": format!("missing-{}", unique()), "workerId": worker })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&client, "/checkin", json!({ "workerId": worker })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_double_checkout_and_checkin_conflict() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let worker = create_worker(&client, &token, "Marta").await;
    let qr_id = format!("QR-{}", unique());
    create_tool(&client, &token, json!({ "name": "Hammer drill", "qrId": qr_id })).await;

    let (status, _) = post(&client, "/checkin", json!({ "qrId": qr_id, "workerId": worker })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post(&client, "/checkout", json!({ "qrId": qr_id, "workerId": worker, "clientName": "Plant 4" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tool"]["status"], "IN_USE");
    assert_eq!(body["log"]["type"], "CHECK_OUT");
    assert_eq!(body["log"]["clientJobId"], "Plant 4");

    let row = dashboard_row(&client, &token, &qr_id).await;
    assert_eq!(row["effectiveStatus"], "IN_USE");
    assert_eq!(row["who"], "Marta");
    assert_eq!(row["where"], "Plant 4");

    let (status, _) = post(&client, "/checkout", json!({ "qrId": qr_id, "workerId": worker, "clientName": "Plant 5" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_calibration_scenario() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let w1 = create_worker(&client, &token, "Worker One").await;
    let w2 = create_worker(&client, &token, "Worker Two").await;
    let qr_id = format!("T1-{}", unique());

    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();
    let tool = create_tool(
        &client,
        &token,
        json!({
            "name": "Pressure gauge",
            "qrId": qr_id,
            "isCalibrationTool": true,
            "nextCalibrationDate": yesterday
        }),
    )
    .await;
    let tool_id = tool["id"].as_str().expect("No tool ID").to_string();

    let row = dashboard_row(&client, &token, &qr_id).await;
    assert_eq!(row["effectiveStatus"], "IN_CALIBRATION");

    // Lapsed calibration blocks the check-out
    let (status, _) = post(&client, "/checkout", json!({ "qrId": qr_id, "workerId": w1, "clientName": "Job 7" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin renews to tomorrow
    let tomorrow = (Utc::now() + Duration::days(1)).to_rfc3339();
    let response = client
        .patch(format!("{}/tools/{}", base_url(), tool_id))
        .bearer_auth(&token)
        .json(&json!({ "nextCalibrationDate": tomorrow }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let renewed: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(renewed["status"], "AVAILABLE");

    let row = dashboard_row(&client, &token, &qr_id).await;
    assert_eq!(row["effectiveStatus"], "AVAILABLE");

    let (status, body) = post(&client, "/checkout", json!({ "qrId": qr_id, "workerId": w1, "clientName": "Job 7" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tool"]["status"], "IN_USE");
    assert_eq!(body["log"]["type"], "CHECK_OUT");

    // Someone else cannot return it
    let (status, body) = post(&client, "/checkin", json!({ "qrId": qr_id, "workerId": w2 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains("Worker One"), "{}", message);
    assert!(message.contains(&w1), "{}", message);

    let (status, body) = post(&client, "/checkin", json!({ "qrId": qr_id, "workerId": w1, "comments": "Dial glass cracked" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tool"]["status"], "AVAILABLE");
    assert_eq!(body["log"]["type"], "CHECK_IN");
    assert_eq!(body["log"]["clientJobId"], "Showroom");
    assert_eq!(body["log"]["comments"], "Dial glass cracked");

    let history: Vec<Value> = client
        .get(format!("{}/history", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(history.len() <= 100);
    let latest = history
        .iter()
        .find(|h| h["toolQrId"] == qr_id.as_str())
        .expect("Movement missing from history");
    assert_eq!(latest["action"], "CHECK_IN");
    assert_eq!(latest["clientName"], "Showroom");
}

#[tokio::test]
#[ignore]
async fn test_renew_requires_date() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let tool = create_tool(&client, &token, json!({ "name": "Scope", "qrId": format!("QR-{}", unique()) })).await;
    let tool_id = tool["id"].as_str().expect("No tool ID");

    let response = client
        .patch(format!("{}/tools/{}", base_url(), tool_id))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .patch(format!("{}/tools/{}", base_url(), Uuid::new_v4()))
        .bearer_auth(&token)
        .json(&json!({ "nextCalibrationDate": "2030-01-01" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_checkouts_single_winner() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let w1 = create_worker(&client, &token, "Racer One").await;
    let w2 = create_worker(&client, &token, "Racer Two").await;
    let qr_id = format!("RACE-{}", unique());
    create_tool(&client, &token, json!({ "name": "Torque wrench", "qrId": qr_id })).await;

    let ((first, _), (second, _)) = tokio::join!(
        post(&client, "/checkout", json!({ "qrId": qr_id, "workerId": w1, "clientName": "Job A" })),
        post(&client, "/checkout", json!({ "qrId": qr_id, "workerId": w2, "clientName": "Job B" })),
    );

    let mut statuses = [first, second];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);

    let history: Vec<Value> = client
        .get(format!("{}/history", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let checkouts = history
        .iter()
        .filter(|h| h["toolQrId"] == qr_id.as_str() && h["action"] == "CHECK_OUT")
        .count();
    assert_eq!(checkouts, 1);

    let row = dashboard_row(&client, &token, &qr_id).await;
    assert_eq!(row["effectiveStatus"], "IN_USE");
}

#[tokio::test]
#[ignore]
async fn test_dashboard_search_wildcards_are_literal() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let qr_id = format!("LIT-{}", unique());
    create_tool(&client, &token, json!({ "name": "Caliper", "qrId": qr_id })).await;

    let rows: Vec<Value> = client
        .get(format!("{}/dashboard", base_url()))
        .query(&[("search", "_%_")])
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(rows.iter().all(|r| r["qrId"] != qr_id.as_str()));
}
