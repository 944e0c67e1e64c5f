mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn register_returns_token_and_sanitized_user() {
    let app = TestApp::spawn().await;

    let response = app.register("Gopal Das", "gopal@example.com", "pw123456").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], "gopal@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn register_cannot_grant_privileged_roles() {
    let app = TestApp::spawn().await;

    // Unknown fields are rejected outright, so a role smuggled into the
    // register payload never reaches the account.
    let response = app
        .client
        .post(format!("{}/auth/register", app.address))
        .json(&serde_json::json!({
            "name": "Sneaky",
            "email": "sneaky@example.com",
            "password": "pw123456",
            "role": "admin"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
    let app = TestApp::spawn().await;

    let first = app.register("One", "same@example.com", "pw123456").await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.register("Two", "same@example.com", "different99").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let body: Value = second.json().await.unwrap();
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn login_roundtrip_issues_working_token() {
    let app = TestApp::spawn().await;

    app.register("Radha", "radha@example.com", "pw123456").await;

    let response = app.login("radha@example.com", "pw123456").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap();

    // The token must be accepted by a protected route.
    let me = app.get("/sadhana/my", token).await;
    assert_eq!(me.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;

    app.register("Radha", "radha@example.com", "pw123456").await;

    let wrong_password = app.login("radha@example.com", "wrong-password").await;
    let unknown_email = app.login("nobody@example.com", "pw123456").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_email.json().await.unwrap();
    assert_eq!(a["error"], "Invalid Credentials");
    assert_eq!(a, b);
}

#[tokio::test]
async fn weak_password_is_rejected_at_registration() {
    let app = TestApp::spawn().await;

    let response = app.register("Short", "short@example.com", "short").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Validation failures use the shared error shape: a generic error plus
    // the field errors in details.
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation error");
    assert!(body["details"]
        .as_str()
        .is_some_and(|d| d.contains("Password must be at least 8 characters")));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/auth/register", app.address))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("Json parse error")));
}

#[tokio::test]
async fn protected_routes_reject_missing_and_garbage_tokens() {
    let app = TestApp::spawn().await;

    let no_token = app
        .client
        .get(format!("{}/sadhana/my", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);

    let garbage = app.get("/sadhana/my", "not-a-jwt").await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "sadhana-service");
}
