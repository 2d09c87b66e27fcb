use time::OffsetDateTime;
use uuid::Uuid;

/// An immutable, append-only chat message scoped to a room.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub room_id: String,
    pub sender_id: Uuid,
    pub text: String,
    pub created_at: OffsetDateTime,
}
