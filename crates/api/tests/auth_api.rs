//! HTTP-level integration tests for registration, login and logout.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_auth, post_json, register_and_login, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_created_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "email": "Alice@Example.com", "password": TEST_PASSWORD, "full_name": "Alice" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["user_id"].is_i64());
    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["full_name"], "Alice");
    assert!(json.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_is_a_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_and_login(&app, "bob@example.com").await;

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "email": "BOB@example.com", "password": TEST_PASSWORD, "full_name": "Bob" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Conflict");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn short_password_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "email": "carol@example.com", "password": "short", "full_name": "Carol" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Bad Request");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_and_login(&app, "dave@example.com").await;

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "dave@example.com", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["token"].is_string());
    assert_eq!(json["expires_in"], 3600);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_and_unknown_email_look_the_same(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_and_login(&app, "erin@example.com").await;

    let wrong_password = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": "erin@example.com", "password": "not-the-password" }),
    )
    .await;
    let unknown_email = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(wrong_password).await,
        body_json(unknown_email).await
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_route_requires_bearer_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(app.clone(), "/api/v1/forms").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/forms", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Unauthorized");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_the_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_and_login(&app, "frank@example.com").await;

    let response = get_auth(app.clone(), "/api/v1/forms", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_auth(app.clone(), "/api/v1/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Logout successful");

    let response = get_auth(app, "/api/v1/forms", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
