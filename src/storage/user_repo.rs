use crate::domain::user::{Profile, User};
use crate::error::{AppError, Result};
use crate::storage::DbPool;
use crate::storage::records::user::{ProfileRecord, UserRecord};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, username: &str, password_hash: &str, bio: &str, interests: &str) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, password_hash, bio, interests)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, bio, interests, last_seen_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(bio)
        .bind(interests)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(record.into())
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash, bio, interests, last_seen_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    pub async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT id, username, bio, interests, last_seen_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    pub async fn update_profile(&self, user_id: Uuid, bio: &str, interests: &str) -> Result<()> {
        sqlx::query("UPDATE users SET bio = $1, interests = $2 WHERE id = $3")
            .bind(bio)
            .bind(interests)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn touch_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_seen_at = now() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Every profile except the requester's, in storage default order.
    pub async fn candidate_pool(&self, requester_id: Uuid, limit: i64) -> Result<Vec<Profile>> {
        let records = sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT id, username, bio, interests, last_seen_at
            FROM users
            WHERE id != $1
            LIMIT $2
            "#,
        )
        .bind(requester_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    pub async fn exists(&self, user_id: Uuid) -> Result<bool> {
        let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return AppError::Validation("handle already taken".to_string());
    }
    AppError::Database(err)
}
