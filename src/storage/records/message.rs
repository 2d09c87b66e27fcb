use crate::domain::message::ChatMessage;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct MessageRecord {
    pub id: Uuid,
    pub room_id: String,
    pub sender_id: Uuid,
    pub text: String,
    pub created_at: OffsetDateTime,
}

impl From<MessageRecord> for ChatMessage {
    fn from(record: MessageRecord) -> Self {
        Self {
            id: record.id,
            room_id: record.room_id,
            sender_id: record.sender_id,
            text: record.text,
            created_at: record.created_at,
        }
    }
}
