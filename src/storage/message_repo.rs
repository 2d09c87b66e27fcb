use crate::domain::message::ChatMessage;
use crate::error::Result;
use crate::storage::DbPool;
use crate::storage::records::message::MessageRecord;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct MessageRepository {
    pool: DbPool,
}

impl MessageRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, room_id: &str, sender_id: Uuid, text: &str) -> Result<ChatMessage> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            INSERT INTO messages (room_id, sender_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, room_id, sender_id, text, created_at
            "#,
        )
        .bind(room_id)
        .bind(sender_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }
}
