use crate::domain::user::Profile;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub bio: String,
    pub interests: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_seen_at: OffsetDateTime,
}

impl From<Profile> for UserProfile {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            bio: profile.bio,
            interests: profile.interests,
            last_seen_at: profile.last_seen_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub interests: String,
}
