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
use uuid::Uuid;

/// Bios are built from per-run nonsense tokens so candidates from other test
/// runs sharing the database can never cross the score threshold.
fn run_token() -> String {
    format!("tok{}", Uuid::new_v4().simple())
}

#[tokio::test]
async fn test_candidates_are_filtered_and_ranked() {
    let app = TestApp::spawn().await;
    let (t1, t2, t3) = (run_token(), run_token(), run_token());

    let requester = app
        .register_user_with_bio(&common::generate_username("req"), &format!("{t1} {t2} {t3}"), "")
        .await;
    let close = app
        .register_user_with_bio(&common::generate_username("close"), &format!("{t1} {t2}"), "")
        .await;
    let weak = app
        .register_user_with_bio(&common::generate_username("weak"), &run_token(), "")
        .await;

    let resp = app
        .client
        .get(format!("{}/v1/candidates", app.server_url))
        .bearer_auth(&requester.token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    let candidates = body["candidates"].as_array().unwrap();

    let ids: Vec<&str> = candidates.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&close.id.to_string().as_str()), "similar candidate missing");
    assert!(!ids.contains(&weak.id.to_string().as_str()), "dissimilar candidate not filtered");

    // Scores are sorted descending and within [0, 1].
    let scores: Vec<f64> = candidates.iter().map(|c| c["score"].as_f64().unwrap()).collect();
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1], "scores not sorted descending");
    }
    for score in scores {
        assert!((0.0..=1.0).contains(&score));
    }

    let close_entry = candidates.iter().find(|c| c["id"] == close.id.to_string()).unwrap();
    // |{t1, t2}| / |{t1, t2, t3}|
    assert!((close_entry["score"].as_f64().unwrap() - 2.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_candidates_exclude_requester() {
    let app = TestApp::spawn().await;
    let token = run_token();

    let requester = app
        .register_user_with_bio(&common::generate_username("self"), &token, "")
        .await;

    let resp = app
        .client
        .get(format!("{}/v1/candidates", app.server_url))
        .bearer_auth(&requester.token)
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = resp.json().await.unwrap();
    let ids: Vec<&str> =
        body["candidates"].as_array().unwrap().iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert!(!ids.contains(&requester.id.to_string().as_str()), "requester listed as own candidate");
}
