use crate::domain::user::{Profile, User};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub bio: String,
    pub interests: String,
    pub last_seen_at: OffsetDateTime,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            password_hash: record.password_hash,
            bio: record.bio,
            interests: record.interests,
            last_seen_at: record.last_seen_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ProfileRecord {
    pub id: Uuid,
    pub username: String,
    pub bio: String,
    pub interests: String,
    pub last_seen_at: OffsetDateTime,
}

impl From<ProfileRecord> for Profile {
    fn from(record: ProfileRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            bio: record.bio,
            interests: record.interests,
            last_seen_at: record.last_seen_at,
        }
    }
}
