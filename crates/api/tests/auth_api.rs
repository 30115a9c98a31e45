//! Sign-up, login, `me`, logout and the bootstrap operator.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, get, get_auth, login, post_json, request};
use serde_json::json;
use wonders_api::auth::ensure_bootstrap_admin;
use wonders_db::AccountStore;

fn signup_body(username: &str, email: &str) -> serde_json::Value {
    json!({ "username": username, "email": email, "password": "member-pass" })
}

#[tokio::test]
async fn test_signup_creates_member() {
    let app = build_test_app();
    let response = post_json(
        &app.router,
        "/api/v1/auth/signup",
        signup_body("jane", "jane@example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["username"], "jane");
    assert_eq!(data["role"], "member");
    assert!(data.get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_rejects_duplicates_and_bad_input() {
    let app = build_test_app();
    post_json(&app.router, "/api/v1/auth/signup", signup_body("jane", "jane@example.com")).await;

    let response = post_json(
        &app.router,
        "/api/v1/auth/signup",
        signup_body("jane", "other@example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(
        &app.router,
        "/api/v1/auth/signup",
        json!({ "username": "kim", "email": "kim@example.com", "password": "short" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["field"], "password");

    let response = post_json(
        &app.router,
        "/api/v1/auth/signup",
        signup_body("lee", "not-an-email"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["field"], "email");
}

#[tokio::test]
async fn test_login_me_logout() {
    let app = build_test_app();
    post_json(&app.router, "/api/v1/auth/signup", signup_body("jane", "jane@example.com")).await;

    let token = login(&app.router, "jane", "member-pass").await;

    let response = get_auth(&app.router, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email"], "jane@example.com");

    let bearer = format!("Bearer {token}");
    let response = request(
        &app.router,
        Method::POST,
        "/api/v1/auth/logout",
        None,
        &[("authorization", bearer.as_str())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = build_test_app();
    post_json(&app.router, "/api/v1/auth/signup", signup_body("jane", "jane@example.com")).await;

    let wrong_password = post_json(
        &app.router,
        "/api/v1/auth/login",
        json!({ "username": "jane", "password": "wrong-pass" }),
    )
    .await;
    let unknown_user = post_json(
        &app.router,
        "/api/v1/auth/login",
        json!({ "username": "ghost", "password": "member-pass" }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong_password).await, body_json(unknown_user).await);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = build_test_app();
    let response = get(&app.router, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(&app.router, "/api/v1/auth/me", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bootstrap_operator_is_created_once() {
    let app = build_test_app();
    let admin = app.state.config.bootstrap_admin.clone().unwrap();

    assert!(ensure_bootstrap_admin(app.accounts.as_ref(), &admin).await.unwrap());
    assert!(!ensure_bootstrap_admin(app.accounts.as_ref(), &admin).await.unwrap());

    let account = app
        .accounts
        .find_by_username(&admin.username)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.role, "admin");
}
