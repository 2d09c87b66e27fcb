#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_panics_doc,
    missing_debug_implementations,
    unreachable_pub
)]
mod common;

use common::TestApp;
use serde_json::json;
use std::time::Duration;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_gateway_rejects_invalid_token() {
    let app = TestApp::spawn().await;
    let url = format!("{}/v1/gateway?token=garbage", app.ws_url);
    assert!(tokio_tungstenite::connect_async(url).await.is_err());
}

#[tokio::test]
async fn test_full_match_and_chat_flow() {
    let app = TestApp::spawn().await;
    let alice = app.register_user(&common::generate_username("alice")).await;
    let bob = app.register_user(&common::generate_username("bob")).await;

    let mut alice_ws = app.connect_ws(&alice.token).await;
    let mut bob_ws = app.connect_ws(&bob.token).await;

    // Alice requests a match with Bob, who is online.
    alice_ws.send_json(&json!({ "type": "request_match", "targetId": bob.id })).await;

    let requested = alice_ws.recv_until_type("match_requested", EVENT_TIMEOUT).await;
    assert_eq!(requested["target"], bob.id.to_string());
    let match_id = requested["id"].as_str().unwrap().to_string();

    let incoming = bob_ws.recv_until_type("incoming_match", EVENT_TIMEOUT).await;
    assert_eq!(incoming["from"], alice.id.to_string());
    assert_eq!(incoming["id"], match_id);

    // Bob accepts; both sides learn the same derived room.
    bob_ws.send_json(&json!({ "type": "accept_match", "matchId": match_id })).await;

    let accepted_a = alice_ws.recv_until_type("match_accepted", EVENT_TIMEOUT).await;
    let accepted_b = bob_ws.recv_until_type("match_accepted", EVENT_TIMEOUT).await;
    assert_eq!(accepted_a["matchId"], match_id);
    assert_eq!(accepted_a["roomId"], accepted_b["roomId"]);

    let room_id = accepted_a["roomId"].as_str().unwrap().to_string();
    assert_eq!(room_id, format!("room_{match_id}"));

    // Both join and Alice sends a message; both connections receive it.
    alice_ws.send_json(&json!({ "type": "join_room", "roomId": room_id })).await;
    bob_ws.send_json(&json!({ "type": "join_room", "roomId": room_id })).await;

    // Room joins have no acknowledgment; give the server a moment to apply them.
    tokio::time::sleep(Duration::from_millis(200)).await;

    alice_ws.send_json(&json!({ "type": "send_message", "roomId": room_id, "text": "hello bob" })).await;

    let msg_a = alice_ws.recv_until_type("message", EVENT_TIMEOUT).await;
    let msg_b = bob_ws.recv_until_type("message", EVENT_TIMEOUT).await;
    for msg in [&msg_a, &msg_b] {
        assert_eq!(msg["roomId"], room_id);
        assert_eq!(msg["senderId"], alice.id.to_string());
        assert_eq!(msg["text"], "hello bob");
        assert!(msg["createdAt"].as_str().is_some());
    }
    assert_eq!(msg_a["id"], msg_b["id"]);

    // The accepted match shows up in both users' listings.
    let resp = app
        .client
        .get(format!("{}/v1/matches", app.server_url))
        .bearer_auth(&bob.token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    let listed = body["matches"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == match_id.as_str())
        .expect("accepted match missing from listing");
    assert_eq!(listed["status"], "accepted");

    alice_ws.close().await;
    bob_ws.close().await;
}

#[tokio::test]
async fn test_accept_by_non_participant_is_forbidden() {
    let app = TestApp::spawn().await;
    let alice = app.register_user(&common::generate_username("fa")).await;
    let bob = app.register_user(&common::generate_username("fb")).await;
    let mallory = app.register_user(&common::generate_username("fm")).await;

    let mut alice_ws = app.connect_ws(&alice.token).await;
    let mut mallory_ws = app.connect_ws(&mallory.token).await;

    alice_ws.send_json(&json!({ "type": "request_match", "targetId": bob.id })).await;
    let requested = alice_ws.recv_until_type("match_requested", EVENT_TIMEOUT).await;
    let match_id = requested["id"].as_str().unwrap().to_string();

    mallory_ws.send_json(&json!({ "type": "accept_match", "matchId": match_id })).await;
    let error = mallory_ws.recv_until_type("error", EVENT_TIMEOUT).await;
    assert_eq!(error["message"], "Not permitted");

    alice_ws.close().await;
    mallory_ws.close().await;
}

#[tokio::test]
async fn test_accept_unknown_match_is_not_found() {
    let app = TestApp::spawn().await;
    let user = app.register_user(&common::generate_username("nf")).await;
    let mut ws = app.connect_ws(&user.token).await;

    ws.send_json(&json!({ "type": "accept_match", "matchId": uuid::Uuid::new_v4() })).await;
    let error = ws.recv_until_type("error", EVENT_TIMEOUT).await;
    assert_eq!(error["message"], "Not found");

    ws.close().await;
}

#[tokio::test]
async fn test_accept_twice_is_idempotent() {
    let app = TestApp::spawn().await;
    let alice = app.register_user(&common::generate_username("ia")).await;
    let bob = app.register_user(&common::generate_username("ib")).await;

    let mut alice_ws = app.connect_ws(&alice.token).await;
    let mut bob_ws = app.connect_ws(&bob.token).await;

    alice_ws.send_json(&json!({ "type": "request_match", "targetId": bob.id })).await;
    let requested = alice_ws.recv_until_type("match_requested", EVENT_TIMEOUT).await;
    let match_id = requested["id"].as_str().unwrap().to_string();

    bob_ws.send_json(&json!({ "type": "accept_match", "matchId": match_id })).await;
    let first = bob_ws.recv_until_type("match_accepted", EVENT_TIMEOUT).await;
    assert_eq!(first["matchId"], match_id.as_str());

    // Second accept: no error, and no duplicate notification either.
    bob_ws.send_json(&json!({ "type": "accept_match", "matchId": match_id })).await;
    let next = bob_ws.recv_event_timeout(Duration::from_millis(500)).await;
    if let Some(event) = next {
        assert_ne!(event["type"], "error", "repeat accept must not error: {event}");
        assert_ne!(event["type"], "match_accepted", "repeat accept must not re-notify");
    }

    alice_ws.close().await;
    bob_ws.close().await;
}

#[tokio::test]
async fn test_room_join_requires_participation() {
    let app = TestApp::spawn().await;
    let alice = app.register_user(&common::generate_username("ra")).await;
    let bob = app.register_user(&common::generate_username("rb")).await;
    let eve = app.register_user(&common::generate_username("re")).await;

    let mut alice_ws = app.connect_ws(&alice.token).await;
    let mut bob_ws = app.connect_ws(&bob.token).await;
    let mut eve_ws = app.connect_ws(&eve.token).await;

    alice_ws.send_json(&json!({ "type": "request_match", "targetId": bob.id })).await;
    let requested = alice_ws.recv_until_type("match_requested", EVENT_TIMEOUT).await;
    let match_id = requested["id"].as_str().unwrap().to_string();

    bob_ws.send_json(&json!({ "type": "accept_match", "matchId": match_id })).await;
    let accepted = bob_ws.recv_until_type("match_accepted", EVENT_TIMEOUT).await;
    let room_id = accepted["roomId"].as_str().unwrap().to_string();

    // Eve holds a valid connection and knows the room string; still refused.
    eve_ws.send_json(&json!({ "type": "join_room", "roomId": room_id })).await;
    let error = eve_ws.recv_until_type("error", EVENT_TIMEOUT).await;
    assert_eq!(error["message"], "Not permitted");

    // A made-up room id is not found at all.
    eve_ws.send_json(&json!({ "type": "join_room", "roomId": "room_bogus" })).await;
    let error = eve_ws.recv_until_type("error", EVENT_TIMEOUT).await;
    assert_eq!(error["message"], "Not found");

    alice_ws.close().await;
    bob_ws.close().await;
    eve_ws.close().await;
}

#[tokio::test]
async fn test_presence_events_on_connect_and_disconnect() {
    let app = TestApp::spawn().await;
    let watcher = app.register_user(&common::generate_username("pw")).await;
    let flaky = app.register_user(&common::generate_username("pf")).await;

    let mut watcher_ws = app.connect_ws(&watcher.token).await;

    // The connect broadcast reaches the new connection too; drain our own.
    let own = watcher_ws.recv_until_type("presence", EVENT_TIMEOUT).await;
    assert_eq!(own["userId"], watcher.id.to_string());

    let flaky_ws = app.connect_ws(&flaky.token).await;
    let online = watcher_ws.recv_until_type("presence", EVENT_TIMEOUT).await;
    assert_eq!(online["userId"], flaky.id.to_string());
    assert_eq!(online["status"], "online");

    flaky_ws.close().await;
    let offline = watcher_ws.recv_until_type("presence", EVENT_TIMEOUT).await;
    assert_eq!(offline["userId"], flaky.id.to_string());
    assert_eq!(offline["status"], "offline");

    watcher_ws.close().await;
}

#[tokio::test]
async fn test_request_match_for_unknown_target_errors() {
    let app = TestApp::spawn().await;
    let user = app.register_user(&common::generate_username("ut")).await;
    let mut ws = app.connect_ws(&user.token).await;

    ws.send_json(&json!({ "type": "request_match", "targetId": uuid::Uuid::new_v4() })).await;
    let error = ws.recv_until_type("error", EVENT_TIMEOUT).await;
    assert_eq!(error["message"], "Not found");

    ws.close().await;
}

#[tokio::test]
async fn test_malformed_frame_reports_error_and_keeps_session() {
    let app = TestApp::spawn().await;
    let user = app.register_user(&common::generate_username("mf")).await;
    let target = app.register_user(&common::generate_username("mt")).await;
    let mut ws = app.connect_ws(&user.token).await;

    ws.send_json(&json!({ "type": "self_destruct" })).await;
    let error = ws.recv_until_type("error", EVENT_TIMEOUT).await;
    assert_eq!(error["message"], "malformed event");

    // The session is still usable afterwards.
    ws.send_json(&json!({ "type": "request_match", "targetId": target.id })).await;
    let requested = ws.recv_until_type("match_requested", EVENT_TIMEOUT).await;
    assert_eq!(requested["target"], target.id.to_string());

    ws.close().await;
}

#[tokio::test]
async fn test_blank_message_is_rejected_and_not_persisted() {
    let app = TestApp::spawn().await;
    let alice = app.register_user(&common::generate_username("ba")).await;
    let bob = app.register_user(&common::generate_username("bb")).await;

    let mut alice_ws = app.connect_ws(&alice.token).await;
    let mut bob_ws = app.connect_ws(&bob.token).await;

    alice_ws.send_json(&json!({ "type": "request_match", "targetId": bob.id })).await;
    let requested = alice_ws.recv_until_type("match_requested", EVENT_TIMEOUT).await;
    let match_id = requested["id"].as_str().unwrap().to_string();

    bob_ws.send_json(&json!({ "type": "accept_match", "matchId": match_id })).await;
    let accepted = alice_ws.recv_until_type("match_accepted", EVENT_TIMEOUT).await;
    let room_id = accepted["roomId"].as_str().unwrap().to_string();

    alice_ws.send_json(&json!({ "type": "join_room", "roomId": room_id })).await;
    bob_ws.send_json(&json!({ "type": "join_room", "roomId": room_id })).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Whitespace-only text is rejected on the sender's connection only.
    alice_ws.send_json(&json!({ "type": "send_message", "roomId": room_id, "text": "   " })).await;
    let error = alice_ws.recv_until_type("error", EVENT_TIMEOUT).await;
    assert_eq!(error["message"], "empty message");

    // A real message still goes through, and it is the only one Bob sees.
    alice_ws.send_json(&json!({ "type": "send_message", "roomId": room_id, "text": "still here" })).await;
    let msg = bob_ws.recv_until_type("message", EVENT_TIMEOUT).await;
    assert_eq!(msg["text"], "still here");

    // Nothing was stored for the rejected frame.
    let pool = common::get_test_pool().await;
    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM messages WHERE room_id = $1")
        .bind(&room_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    alice_ws.close().await;
    bob_ws.close().await;
}
