use crate::domain::matching::{MatchRecord, MatchStatus};
use crate::error::AppError;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct MatchRow {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub status: String,
    pub created_at: OffsetDateTime,
}

impl TryFrom<MatchRow> for MatchRecord {
    type Error = AppError;

    /// Rows only ever hold the two known status strings; anything else is a
    /// corrupted row and must not surface as a still-requested match.
    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let status: MatchStatus = row.status.parse().map_err(|()| {
            tracing::error!(match_id = %row.id, status = %row.status, "Unknown match status in storage");
            AppError::Internal
        })?;

        Ok(Self { id: row.id, user_a: row.user_a, user_b: row.user_b, status, created_at: row.created_at })
    }
}
