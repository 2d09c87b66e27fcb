use crate::api::schemas::profile::UserProfile;
use crate::domain::matching::{MatchRecord, ScoredCandidate};
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub user: UserProfile,
    pub score: f64,
}

impl From<ScoredCandidate> for Candidate {
    fn from(candidate: ScoredCandidate) -> Self {
        Self { user: candidate.profile.into(), score: candidate.score }
    }
}

#[derive(Debug, Serialize)]
pub struct CandidateList {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<MatchRecord> for MatchView {
    fn from(record: MatchRecord) -> Self {
        Self {
            id: record.id,
            user_a: record.user_a,
            user_b: record.user_b,
            status: record.status.as_str().to_string(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchList {
    pub matches: Vec<MatchView>,
}
