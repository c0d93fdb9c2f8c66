//! Integration tests for the flat-file content sections.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use serde_json::json;

use agency_integration_tests::{TestContext, json_body};

#[tokio::test]
async fn test_fresh_document_sections() {
    let ctx = TestContext::spawn().await;
    let admin = ctx.admin_client().await;

    let hero = json_body(admin.get(ctx.url("/api/admin/hero")).send().await.unwrap()).await;
    assert_eq!(hero["ctaText"], "");
    let team = json_body(admin.get(ctx.url("/api/admin/team")).send().await.unwrap()).await;
    assert_eq!(team, json!([]));
}

#[tokio::test]
async fn test_replace_section_keeps_others() {
    let ctx = TestContext::spawn().await;
    let admin = ctx.admin_client().await;

    let resp = admin
        .put(ctx.url("/api/admin/clients"))
        .json(&json!(["Acme", "Globex"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "success": true }));

    let resp = admin
        .put(ctx.url("/api/admin/hero"))
        .json(&json!({
            "title": "We build brands",
            "subtitle": "Since 2012",
            "ctaText": "Talk to us",
            "ctaLink": "/contact",
            "backgroundImage": "/media/hero/bg.jpg"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let clients = json_body(admin.get(ctx.url("/api/admin/clients")).send().await.unwrap()).await;
    assert_eq!(clients, json!(["Acme", "Globex"]));

    let document = ctx.content_file.read().await.unwrap();
    assert_eq!(document.hero.cta_link, "/contact");
    assert_eq!(document.clients, ["Acme", "Globex"]);
}

#[tokio::test]
async fn test_malformed_body_is_rejected_with_fixed_wording() {
    let ctx = TestContext::spawn().await;
    let admin = ctx.admin_client().await;

    let resp = admin
        .put(ctx.url("/api/admin/hero"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(resp).await,
        json!({ "error": "Failed to update hero content" })
    );

    let resp = admin
        .put(ctx.url("/api/admin/services"))
        .json(&json!({ "title": "not a list" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(resp).await,
        json!({ "error": "Failed to update services" })
    );

    let services = json_body(admin.get(ctx.url("/api/admin/services")).send().await.unwrap()).await;
    assert_eq!(services, json!([]));
}

#[tokio::test]
async fn test_unknown_section_is_not_found() {
    let ctx = TestContext::spawn().await;
    let admin = ctx.admin_client().await;

    let resp = admin
        .get(ctx.url("/api/admin/testimonials"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
