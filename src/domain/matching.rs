use crate::domain::user::Profile;
use time::OffsetDateTime;
use uuid::Uuid;

const ROOM_PREFIX: &str = "room_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Requested,
    Accepted,
}

impl MatchStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Accepted => "accepted",
        }
    }
}

impl std::str::FromStr for MatchStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(Self::Requested),
            "accepted" => Ok(Self::Accepted),
            _ => Err(()),
        }
    }
}

/// A proposed or confirmed pairing between two users.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub status: MatchStatus,
    pub created_at: OffsetDateTime,
}

impl MatchRecord {
    #[must_use]
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }

    /// Deterministic room identifier for an accepted match. Collision-free
    /// because match ids are unique.
    #[must_use]
    pub fn room_id(&self) -> String {
        room_id_for(self.id)
    }
}

#[must_use]
pub fn room_id_for(match_id: Uuid) -> String {
    format!("{ROOM_PREFIX}{match_id}")
}

/// Recovers the match id a room identifier was derived from.
#[must_use]
pub fn match_id_from_room(room_id: &str) -> Option<Uuid> {
    room_id.strip_prefix(ROOM_PREFIX).and_then(|s| Uuid::parse_str(s).ok())
}

/// A candidate profile paired with its similarity score against the requester.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub profile: Profile,
    pub score: f64,
}
