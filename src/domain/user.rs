use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub bio: String,
    pub interests: String,
    pub last_seen_at: OffsetDateTime,
}

/// Public view of a user, safe to return to any authenticated caller.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub bio: String,
    pub interests: String,
    pub last_seen_at: OffsetDateTime,
}

impl Profile {
    /// The free text a user is matched on: bio and interests, space-joined.
    #[must_use]
    pub fn match_text(&self) -> String {
        format!("{} {}", self.bio, self.interests)
    }
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            bio: user.bio,
            interests: user.interests,
            last_seen_at: user.last_seen_at,
        }
    }
}
