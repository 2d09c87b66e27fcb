use crate::services::chat_service::ChatService;
use crate::services::gateway::protocol::{ClientEvent, PresenceStatus, ServerEvent};
use crate::services::match_service::MatchService;
use crate::services::presence::{ConnectionHandle, PresenceRegistry};
use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures::{SinkExt, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

pub(crate) struct Session {
    pub(crate) user_id: Uuid,
    pub(crate) conn_id: Uuid,
    pub(crate) request_id: String,
    pub(crate) socket: WebSocket,
    pub(crate) match_service: MatchService,
    pub(crate) chat_service: ChatService,
    pub(crate) presence: Arc<PresenceRegistry>,
    pub(crate) outbound_buffer_size: usize,
    pub(crate) shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl Session {
    #[tracing::instrument(
        name = "gateway_session",
        skip(self),
        fields(
            user_id = %self.user_id,
            request_id = %self.request_id,
            conn_id = %self.conn_id,
        )
    )]
    pub(crate) async fn run(self) {
        let Self {
            user_id,
            conn_id,
            socket,
            match_service,
            chat_service,
            presence,
            outbound_buffer_size,
            mut shutdown_rx,
            ..
        } = self;

        tracing::info!("Gateway connected");

        let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerEvent>(outbound_buffer_size);

        presence.register(user_id, ConnectionHandle { conn_id, tx: outbound_tx.clone() });
        presence.broadcast(&ServerEvent::Presence { user_id, status: PresenceStatus::Online });

        let (mut ws_sink, mut ws_stream) = socket.split();
        let mut joined_rooms: HashSet<String> = HashSet::new();

        loop {
            if *shutdown_rx.borrow() {
                tracing::info!("Shutdown signal received, closing gateway session");
                let _ = ws_sink
                    .send(WsMessage::Close(Some(axum::extract::ws::CloseFrame {
                        code: axum::extract::ws::close_code::AWAY,
                        reason: "Server shutting down".into(),
                    })))
                    .await;
                break;
            }

            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {}

                msg = ws_stream.next() => {
                    let continue_loop = match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            match serde_json::from_str::<ClientEvent>(&text) {
                                Ok(event) => {
                                    dispatch_event(
                                        event,
                                        user_id,
                                        conn_id,
                                        &match_service,
                                        &chat_service,
                                        &outbound_tx,
                                        &mut joined_rooms,
                                    )
                                    .await;
                                }
                                Err(e) => {
                                    tracing::warn!(error = %e, "Failed to decode gateway frame");
                                    send_error(&outbound_tx, "malformed event");
                                }
                            }
                            true
                        }
                        Some(Ok(WsMessage::Close(_)) | Err(_)) | None => false,
                        Some(Ok(WsMessage::Binary(_))) => {
                            tracing::warn!("Received unexpected binary frame");
                            true
                        }
                        Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => true,
                    };

                    if !continue_loop { break; }
                }

                msg = outbound_rx.recv() => {
                    match msg {
                        Some(event) => {
                            let Ok(frame) = serde_json::to_string(&event) else {
                                tracing::error!("Failed to encode server event");
                                continue;
                            };
                            if ws_sink.send(WsMessage::Text(frame.into())).await.is_err() { break; }
                        }
                        None => break,
                    }
                }
            }
        }

        let _ = ws_sink.close().await;

        for room_id in &joined_rooms {
            chat_service.leave_room(room_id, conn_id);
        }

        // A reconnect may already own the presence slot; only the connection
        // that still holds it announces the user offline.
        if presence.unregister(user_id, conn_id) {
            presence.broadcast(&ServerEvent::Presence { user_id, status: PresenceStatus::Offline });
        }

        tracing::info!("Gateway disconnected");
    }
}

/// Applies a single client event. Failures are reported on the originating
/// connection only; the session keeps running.
async fn dispatch_event(
    event: ClientEvent,
    user_id: Uuid,
    conn_id: Uuid,
    match_service: &MatchService,
    chat_service: &ChatService,
    outbound_tx: &mpsc::Sender<ServerEvent>,
    joined_rooms: &mut HashSet<String>,
) {
    match event {
        ClientEvent::RequestMatch { target_id } => {
            match match_service.request_match(user_id, target_id).await {
                Ok(record) => {
                    send_event(outbound_tx, ServerEvent::MatchRequested { id: record.id, target: target_id });
                }
                Err(e) => send_error(outbound_tx, &e.to_string()),
            }
        }
        ClientEvent::AcceptMatch { match_id } => {
            // Participants are notified through the presence registry; only
            // failures come back on this connection directly.
            if let Err(e) = match_service.accept_match(user_id, match_id).await {
                send_error(outbound_tx, &e.to_string());
            }
        }
        ClientEvent::JoinRoom { room_id } => {
            match chat_service.join_room(user_id, conn_id, &room_id, outbound_tx.clone()).await {
                Ok(()) => {
                    joined_rooms.insert(room_id);
                }
                Err(e) => send_error(outbound_tx, &e.to_string()),
            }
        }
        ClientEvent::SendMessage { room_id, text } => {
            if let Err(e) = chat_service.send_message(user_id, &room_id, &text).await {
                send_error(outbound_tx, &e.to_string());
            }
        }
    }
}

// try_send, not send: dispatch runs inside the select loop that also drains
// the outbound channel, so blocking on a full buffer here would deadlock.
fn send_event(tx: &mpsc::Sender<ServerEvent>, event: ServerEvent) {
    if tx.try_send(event).is_err() {
        tracing::debug!("Session outbound channel closed or full");
    }
}

fn send_error(tx: &mpsc::Sender<ServerEvent>, message: &str) {
    send_event(tx, ServerEvent::Error { message: message.to_string() });
}
