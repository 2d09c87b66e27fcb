//! JSON wire protocol for the persistent gateway channel. Frames are tagged
//! by a `type` field; payload fields are camelCase.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Events a client may send over the gateway.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    RequestMatch { target_id: Uuid },
    #[serde(rename_all = "camelCase")]
    AcceptMatch { match_id: Uuid },
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: String, text: String },
}

/// Events the server pushes to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    Presence { user_id: Uuid, status: PresenceStatus },
    #[serde(rename_all = "camelCase")]
    MatchRequested { id: Uuid, target: Uuid },
    #[serde(rename_all = "camelCase")]
    IncomingMatch { id: Uuid, from: Uuid },
    #[serde(rename_all = "camelCase")]
    MatchAccepted { match_id: Uuid, room_id: String },
    #[serde(rename_all = "camelCase")]
    Message {
        id: Uuid,
        room_id: String,
        sender_id: Uuid,
        text: String,
        #[serde(with = "time::serde::rfc3339")]
        created_at: OffsetDateTime,
    },
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    Online,
    Offline,
}
