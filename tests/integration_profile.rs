#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_panics_doc,
    missing_debug_implementations,
    unreachable_pub
)]
mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_profile_fetch() {
    let app = TestApp::spawn().await;
    let username = common::generate_username("me");
    let user = app.register_user_with_bio(&username, "books", "chess").await;

    let resp = app
        .client
        .get(format!("{}/v1/me", app.server_url))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["id"], user.id.to_string());
    assert_eq!(body["user"]["username"], username);
    assert_eq!(body["user"]["bio"], "books");
    assert_eq!(body["user"]["interests"], "chess");
    assert!(body["user"]["lastSeenAt"].as_str().is_some());
}

#[tokio::test]
async fn test_profile_update_roundtrip() {
    let app = TestApp::spawn().await;
    let username = common::generate_username("edit");
    let user = app.register_user_with_bio(&username, "old bio", "old interests").await;

    let resp = app
        .client
        .put(format!("{}/v1/me", app.server_url))
        .bearer_auth(&user.token)
        .json(&json!({ "bio": "new bio", "interests": "new interests" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["bio"], "new bio");
    assert_eq!(body["user"]["interests"], "new interests");

    // A fresh fetch observes the update.
    let resp = app
        .client
        .get(format!("{}/v1/me", app.server_url))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["bio"], "new bio");
}
