//! Integration tests for the shared-password admin session.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use serde_json::json;

use agency_integration_tests::{ADMIN_PASSWORD, TestContext, json_body};

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::spawn().await;
    let client = ctx.client();

    let resp = client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    ctx.store.set_unavailable(true);
    let resp = client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let ctx = TestContext::spawn().await;
    let client = ctx.client();

    let resp = client
        .post(ctx.url("/api/auth/login"))
        .json(&json!({ "password": "not the password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let status = json_body(
        client
            .get(ctx.url("/api/auth/session"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status["authenticated"], false);
    assert!(status.get("logged_in_at").is_none());
}

#[tokio::test]
async fn test_login_session_logout() {
    let ctx = TestContext::spawn().await;
    let client = ctx.client();

    let resp = client
        .post(ctx.url("/api/auth/login"))
        .json(&json!({ "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));

    let status = json_body(
        client
            .get(ctx.url("/api/auth/session"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status["authenticated"], true);
    assert!(status["logged_in_at"].is_string());

    let resp = client
        .post(ctx.url("/api/auth/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let status = json_body(
        client
            .get(ctx.url("/api/auth/session"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status["authenticated"], false);
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let ctx = TestContext::spawn().await;
    let client = ctx.client();

    let resp = client
        .post(ctx.url("/api/admin/collections/services"))
        .json(&json!({ "title": "SEO", "description": "Rank.", "icon": "search" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await, json!({ "error": "Unauthorized" }));

    let resp = client
        .put(ctx.url("/api/admin/settings/hero"))
        .json(&json!({ "title": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client.get(ctx.url("/api/admin/hero")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Public reads stay open.
    let resp = client
        .get(ctx.url("/api/content/services"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
