use crate::domain::message::ChatMessage;
use crate::error::{AppError, Result};
use crate::services::gateway::protocol::ServerEvent;
use crate::services::match_service::MatchService;
use crate::services::rooms::RoomRelay;
use crate::storage::message_repo::MessageRepository;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Room subscriptions and message delivery. Messages are persisted before
/// fan-out, so delivery to current members is at-least-once with respect to
/// the stored record.
#[derive(Clone, Debug)]
pub struct ChatService {
    relay: Arc<RoomRelay>,
    message_repo: MessageRepository,
    match_service: MatchService,
}

impl ChatService {
    #[must_use]
    pub const fn new(relay: Arc<RoomRelay>, message_repo: MessageRepository, match_service: MatchService) -> Self {
        Self { relay, message_repo, match_service }
    }

    /// Subscribes a connection to a room after checking the actor is a
    /// participant of the accepted match the room derives from.
    #[tracing::instrument(skip(self, tx), err(level = "warn"))]
    pub async fn join_room(
        &self,
        actor_id: Uuid,
        conn_id: Uuid,
        room_id: &str,
        tx: mpsc::Sender<ServerEvent>,
    ) -> Result<()> {
        self.match_service.authorize_room(actor_id, room_id).await?;
        self.relay.join(room_id, conn_id, tx);
        tracing::debug!(room_id = %room_id, "Connection joined room");
        Ok(())
    }

    pub fn leave_room(&self, room_id: &str, conn_id: Uuid) {
        self.relay.leave(room_id, conn_id);
    }

    /// Persists a message and broadcasts it to every connection currently in
    /// the room, the sender's own included.
    #[tracing::instrument(skip(self, text), err(level = "warn"))]
    pub async fn send_message(&self, sender_id: Uuid, room_id: &str, text: &str) -> Result<ChatMessage> {
        if text.trim().is_empty() {
            return Err(AppError::Validation("empty message".to_string()));
        }

        let message = self.message_repo.create(room_id, sender_id, text).await?;

        self.relay.broadcast(
            room_id,
            &ServerEvent::Message {
                id: message.id,
                room_id: message.room_id.clone(),
                sender_id: message.sender_id,
                text: message.text.clone(),
                created_at: message.created_at,
            },
        );

        Ok(message)
    }
}
