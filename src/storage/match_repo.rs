use crate::domain::matching::{MatchRecord, MatchStatus};
use crate::error::Result;
use crate::storage::DbPool;
use crate::storage::records::matching::MatchRow;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct MatchRepository {
    pool: DbPool,
}

impl MatchRepository {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_a: Uuid, user_b: Uuid) -> Result<MatchRecord> {
        let row = sqlx::query_as::<_, MatchRow>(
            r#"
            INSERT INTO matches (user_a, user_b, status)
            VALUES ($1, $2, $3)
            RETURNING id, user_a, user_b, status, created_at
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(MatchStatus::Requested.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    pub async fn find_by_id(&self, match_id: Uuid) -> Result<Option<MatchRecord>> {
        let row = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, user_a, user_b, status, created_at
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Atomically transitions `requested` -> `accepted`. Returns `false` when
    /// no row changed, i.e. the match was already accepted by a concurrent
    /// actor. The conditional update is what closes the re-check-then-write
    /// race window.
    pub async fn mark_accepted(&self, match_id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE matches SET status = $1 WHERE id = $2 AND status = $3")
            .bind(MatchStatus::Accepted.as_str())
            .bind(match_id)
            .bind(MatchStatus::Requested.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MatchRecord>> {
        let rows = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, user_a, user_b, status, created_at
            FROM matches
            WHERE user_a = $1 OR user_b = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
