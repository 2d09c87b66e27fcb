use crate::config::MatchingConfig;
use crate::domain::matching::{MatchRecord, MatchStatus, ScoredCandidate};
use crate::domain::user::Profile;
use crate::error::{AppError, Result};
use crate::services::gateway::protocol::ServerEvent;
use crate::services::presence::PresenceRegistry;
use crate::services::similarity::{jaccard, tokenize};
use crate::storage::match_repo::MatchRepository;
use crate::storage::user_repo::UserRepository;
use std::sync::Arc;
use uuid::Uuid;

/// Candidate ranking and the match lifecycle (`requested` -> `accepted`).
#[derive(Clone, Debug)]
pub struct MatchService {
    config: MatchingConfig,
    user_repo: UserRepository,
    match_repo: MatchRepository,
    presence: Arc<PresenceRegistry>,
}

/// Scores a candidate pool against the requester's match text, retains
/// entries at or above the threshold and sorts them by descending score.
/// `Vec::sort_by` is stable, so ties keep the pool's original order.
fn score_pool(requester: &Profile, pool: Vec<Profile>, threshold: f64) -> Vec<ScoredCandidate> {
    let requester_tokens = tokenize(&requester.match_text());

    let mut scored: Vec<ScoredCandidate> = pool
        .into_iter()
        .map(|profile| {
            let score = jaccard(&requester_tokens, &tokenize(&profile.match_text()));
            ScoredCandidate { profile, score }
        })
        .filter(|candidate| candidate.score >= threshold)
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

impl MatchService {
    #[must_use]
    pub const fn new(
        config: MatchingConfig,
        user_repo: UserRepository,
        match_repo: MatchRepository,
        presence: Arc<PresenceRegistry>,
    ) -> Self {
        Self { config, user_repo, match_repo, presence }
    }

    /// Ranked, threshold-filtered candidates for a requester.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn ranked_candidates(&self, requester_id: Uuid) -> Result<Vec<ScoredCandidate>> {
        let requester = self.user_repo.find_profile(requester_id).await?.ok_or(AppError::NotFound)?;
        let pool = self.user_repo.candidate_pool(requester_id, self.config.candidate_pool_limit).await?;

        Ok(score_pool(&requester, pool, self.config.score_threshold))
    }

    /// Creates a `requested` match and pushes `incoming_match` to the target
    /// if they are online. An offline target never learns about the request;
    /// there is no durable outbox.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn request_match(&self, requester_id: Uuid, target_id: Uuid) -> Result<MatchRecord> {
        if !self.user_repo.exists(target_id).await? {
            return Err(AppError::NotFound);
        }

        let record = self.match_repo.create(requester_id, target_id).await?;
        tracing::info!(match_id = %record.id, "Match requested");

        self.presence.notify(target_id, ServerEvent::IncomingMatch { id: record.id, from: requester_id });

        Ok(record)
    }

    /// Accepts a match on behalf of `actor_id` and notifies both participants
    /// of the derived room. Accepting an already-accepted match is a no-op:
    /// the room id is returned again but nobody is re-notified.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn accept_match(&self, actor_id: Uuid, match_id: Uuid) -> Result<(MatchRecord, String)> {
        let record = self.match_repo.find_by_id(match_id).await?.ok_or(AppError::NotFound)?;

        if !record.is_participant(actor_id) {
            return Err(AppError::Forbidden);
        }

        let room_id = record.room_id();

        // Single conditional update; a concurrent accept loses the race and
        // takes the idempotent path instead of double-notifying.
        let transitioned = self.match_repo.mark_accepted(match_id).await?;
        if transitioned {
            tracing::info!(match_id = %match_id, room_id = %room_id, "Match accepted");

            let event = ServerEvent::MatchAccepted { match_id, room_id: room_id.clone() };
            self.presence.notify(record.user_a, event.clone());
            self.presence.notify(record.user_b, event);
        }

        Ok((record, room_id))
    }

    /// Every match the user participates in, either side.
    pub async fn list_matches(&self, user_id: Uuid) -> Result<Vec<MatchRecord>> {
        self.match_repo.list_for_user(user_id).await
    }

    /// Checks that `actor_id` may enter `room_id`: the id must derive from an
    /// existing match, the match must be accepted, and the actor must be a
    /// participant. Holding a valid connection and a room string is not
    /// enough on its own.
    pub async fn authorize_room(&self, actor_id: Uuid, room_id: &str) -> Result<()> {
        let match_id =
            crate::domain::matching::match_id_from_room(room_id).ok_or(AppError::NotFound)?;
        let record = self.match_repo.find_by_id(match_id).await?.ok_or(AppError::NotFound)?;

        if !record.is_participant(actor_id) {
            return Err(AppError::Forbidden);
        }
        if record.status != MatchStatus::Accepted {
            return Err(AppError::Forbidden);
        }

        Ok(())
    }
}
