//! Web API authentication tests.
//!
//! End-to-end tests over the full router with an in-memory database and a
//! recording mailer. The plaintext verification codes and reset tokens are
//! pulled out of the recorded emails, the same way a user would read them.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use shopsphere_auth::config::AuthConfig;
use shopsphere_auth::db::Database;
use shopsphere_auth::mail::{MemoryMailer, OutgoingMail};
use shopsphere_auth::web::handlers::AppState;
use shopsphere_auth::web::router::create_router;

/// Create a test server with an in-memory database and a recording mailer.
async fn create_test_server() -> (TestServer, MemoryMailer) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let mailer = MemoryMailer::new();

    let auth_config = AuthConfig {
        jwt_secret: "test-secret-key-for-testing-only".to_string(),
        session_expiry_secs: 900,
        client_url: "http://client.test".to_string(),
        secure_cookies: false,
    };

    let app_state = Arc::new(AppState::new(&db, Arc::new(mailer.clone()), &auth_config));
    let router = create_router(app_state, &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, mailer)
}

/// Pull the six-digit verification code out of a recorded email.
fn extract_code(mail: &OutgoingMail) -> String {
    mail.html
        .split(|c: char| !c.is_ascii_digit())
        .find(|s| s.len() == 6)
        .expect("verification code in mail body")
        .to_string()
}

/// Pull the reset token out of a recorded reset-request email.
fn extract_reset_token(mail: &OutgoingMail) -> String {
    let start = mail.html.find("/reset-password/").expect("reset URL in mail body")
        + "/reset-password/".len();
    mail.html[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Helper to sign up a user.
async fn signup_user(server: &TestServer, name: &str, email: &str, password: &str) {
    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "name": name,
            "email": email,
            "password": password,
            "passwordConfirm": password
        }))
        .await;
    response.assert_status_ok();
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_success() {
    let (server, mailer) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "name": "Ann",
            "email": "ann@example.com",
            "password": "Password123!",
            "passwordConfirm": "Password123!"
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["user"]["name"], "Ann");
    assert_eq!(body["user"]["email"], "ann@example.com");
    assert_eq!(body["user"]["role"], "customer");
    assert_eq!(body["user"]["isVerified"], false);
    assert_eq!(body["user"]["cartItems"], json!([]));

    // The response never leaks the password hash or the pending secret
    let raw = response.text();
    assert!(!raw.contains("argon2"));
    assert!(!raw.contains("password"));

    // A verification email went out
    let mail = mailer.last().expect("verification email");
    assert_eq!(mail.to, "ann@example.com");
    assert_eq!(extract_code(&mail).len(), 6);
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let (server, _mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;

    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "name": "Other Ann",
            "email": "ANN@EXAMPLE.COM",
            "password": "Password456!",
            "passwordConfirm": "Password456!"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "This email already exists. Try to use another one"
    );
}

#[tokio::test]
async fn test_signup_missing_fields() {
    let (server, _mailer) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({ "email": "ann@example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_signup_password_mismatch() {
    let (server, _mailer) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "name": "Ann",
            "email": "ann@example.com",
            "password": "Password123!",
            "passwordConfirm": "Different123!"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Passwords are not the same");
}

#[tokio::test]
async fn test_signup_invalid_email() {
    let (server, _mailer) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/signup")
        .json(&json!({
            "name": "Ann",
            "email": "not-an-email",
            "password": "Password123!",
            "passwordConfirm": "Password123!"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Email verification
// ============================================================================

#[tokio::test]
async fn test_verify_email_success() {
    let (server, mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;
    let code = extract_code(&mailer.last().unwrap());

    let response = server
        .post("/api/v1/auth/verify-email")
        .json(&json!({ "verificationCode": code }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["user"]["isVerified"], true);

    // A session cookie opens immediately
    let cookie = response.cookie("session");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));

    // Followed by the welcome email
    let mail = mailer.last().unwrap();
    assert!(mail.html.contains("Ann"));
    assert_eq!(mail.subject, "Welcome to Shop Sphere");
}

#[tokio::test]
async fn test_verify_email_wrong_code() {
    let (server, _mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;

    let response = server
        .post("/api/v1/auth/verify-email")
        .json(&json!({ "verificationCode": "000000" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Verification code is invalid or has expired");
}

#[tokio::test]
async fn test_verify_email_code_is_single_use() {
    let (server, mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;
    let code = extract_code(&mailer.last().unwrap());

    server
        .post("/api/v1/auth/verify-email")
        .json(&json!({ "verificationCode": code }))
        .await
        .assert_status_ok();

    let replay = server
        .post("/api/v1/auth/verify-email")
        .json(&json!({ "verificationCode": code }))
        .await;
    replay.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Login / logout / me
// ============================================================================

#[tokio::test]
async fn test_login_success_sets_session_cookie() {
    let (server, _mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ann@example.com", "password": "Password123!" }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Logged in successfully");
    assert_eq!(body["user"]["email"], "ann@example.com");

    let cookie = response.cookie("session");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (server, _mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;

    let wrong_password = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ann@example.com", "password": "WrongPass123!" }))
        .await;
    wrong_password.assert_status(StatusCode::UNAUTHORIZED);

    let no_such_user = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ghost@example.com", "password": "Password123!" }))
        .await;
    no_such_user.assert_status(StatusCode::UNAUTHORIZED);

    // Identical body for both failure causes
    let a: Value = wrong_password.json();
    let b: Value = no_such_user.json();
    assert_eq!(a, b);
    assert_eq!(a["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let (server, _mailer) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ann@example.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_requires_session() {
    let (server, _mailer) = create_test_server().await;

    let response = server.get("/api/v1/auth/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_me_with_session() {
    let (server, _mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;

    let login = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ann@example.com", "password": "Password123!" }))
        .await;
    let cookie = login.cookie("session");

    let response = server.get("/api/v1/auth/me").add_cookie(cookie).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["user"]["email"], "ann@example.com");
    assert_eq!(body["user"]["role"], "customer");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (server, _mailer) = create_test_server().await;

    let response = server.post("/api/v1/auth/logout").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "Logged out successfully");

    // Removal cookie: empty value, immediate expiry
    let cookie = response.cookie("session");
    assert!(cookie.value().is_empty());
    assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
}

// ============================================================================
// Forgot / reset password
// ============================================================================

#[tokio::test]
async fn test_forgot_password_unknown_email() {
    let (server, _mailer) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/forgot-password")
        .json(&json!({ "email": "ghost@example.com" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "This email does not exist.");
}

#[tokio::test]
async fn test_forgot_password_sends_reset_link() {
    let (server, mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;

    let response = server
        .post("/api/v1/auth/forgot-password")
        .json(&json!({ "email": "ann@example.com" }))
        .await;

    response.assert_status_ok();

    let mail = mailer.last().unwrap();
    assert!(mail.html.contains("http://client.test/reset-password/"));
    assert_eq!(extract_reset_token(&mail).len(), 40);
}

#[tokio::test]
async fn test_reset_password_rejects_reused_password() {
    let (server, mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;

    server
        .post("/api/v1/auth/forgot-password")
        .json(&json!({ "email": "ann@example.com" }))
        .await
        .assert_status_ok();
    let token = extract_reset_token(&mailer.last().unwrap());

    let response = server
        .post(&format!("/api/v1/auth/reset-password/{}", token))
        .json(&json!({ "newPassword": "Password123!", "newPasswordConfirm": "Password123!" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "You used this password before. Please use another one."
    );
}

#[tokio::test]
async fn test_reset_password_invalid_token() {
    let (server, _mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;

    let response = server
        .post("/api/v1/auth/reset-password/bogus-token")
        .json(&json!({ "newPassword": "NewPass123!", "newPasswordConfirm": "NewPass123!" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Token is invalid or has expired.");
}

#[tokio::test]
async fn test_reset_password_missing_fields() {
    let (server, _mailer) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/reset-password/sometoken")
        .json(&json!({ "password": "NewPass123!" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test]
async fn test_full_signup_verify_login_flow() {
    let (server, mailer) = create_test_server().await;

    // Signup
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;
    let code = extract_code(&mailer.last().unwrap());

    // Verify with the emailed code
    let verify = server
        .post("/api/v1/auth/verify-email")
        .json(&json!({ "verificationCode": code }))
        .await;
    verify.assert_status_ok();

    // Login and access the profile
    let login = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ann@example.com", "password": "Password123!" }))
        .await;
    login.assert_status_ok();

    let me = server
        .get("/api/v1/auth/me")
        .add_cookie(login.cookie("session"))
        .await;
    me.assert_status_ok();

    let body: Value = me.json();
    assert_eq!(body["user"]["isVerified"], true);
}

#[tokio::test]
async fn test_full_password_reset_flow() {
    let (server, mailer) = create_test_server().await;
    signup_user(&server, "Ann", "ann@example.com", "Password123!").await;

    // Request a reset and follow the emailed token
    server
        .post("/api/v1/auth/forgot-password")
        .json(&json!({ "email": "ann@example.com" }))
        .await
        .assert_status_ok();
    let token = extract_reset_token(&mailer.last().unwrap());

    let reset = server
        .post(&format!("/api/v1/auth/reset-password/{}", token))
        .json(&json!({ "newPassword": "NewPass456!", "newPasswordConfirm": "NewPass456!" }))
        .await;
    reset.assert_status_ok();

    // Confirmation email went out
    assert_eq!(
        mailer.last().unwrap().subject,
        "Your password is reset successfully"
    );

    // The old password no longer works
    server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ann@example.com", "password": "Password123!" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // The new one does
    server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ann@example.com", "password": "NewPass456!" }))
        .await
        .assert_status_ok();

    // The token was consumed
    server
        .post(&format!("/api/v1/auth/reset-password/{}", token))
        .json(&json!({ "newPassword": "OtherPass789!", "newPasswordConfirm": "OtherPass789!" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
