mod common;

use axum::http::{Method, StatusCode};

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = common::spawn_app().await;
    let (status, body) = app
        .send(Method::GET, "/api/v1/portfolios", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = common::spawn_app().await;
    let (status, _) = app
        .send_with_token(Method::GET, "/api/v1/portfolios", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_require_admin_role() {
    let app = common::spawn_app().await;
    let (status, body) = app
        .send(Method::GET, "/api/v1/admin/portfolios", Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);

    let (status, body) = app
        .send(Method::GET, "/api/v1/admin/portfolios", Some("admin"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = app
        .send(Method::DELETE, "/api/v1/quotes/cache", Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .send(Method::DELETE, "/api/v1/quotes/cache", Some("admin"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
