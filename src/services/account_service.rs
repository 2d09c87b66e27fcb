use crate::config::AuthConfig;
use crate::domain::auth::{Claims, Password};
use crate::domain::user::Profile;
use crate::error::{AppError, Result};
use crate::storage::user_repo::UserRepository;
use uuid::Uuid;

/// Registration, login, token issuance and profile management.
#[derive(Clone, Debug)]
pub struct AccountService {
    config: AuthConfig,
    user_repo: UserRepository,
}

/// An issued credential paired with the profile it is bound to.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub token: String,
    pub profile: Profile,
}

impl AccountService {
    #[must_use]
    pub const fn new(config: AuthConfig, user_repo: UserRepository) -> Self {
        Self { config, user_repo }
    }

    #[tracing::instrument(skip(self, password), fields(user_id = tracing::field::Empty), err(level = "warn"))]
    pub async fn register(
        &self,
        username: String,
        password: String,
        bio: String,
        interests: String,
    ) -> Result<AuthenticatedUser> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation("missing fields".to_string()));
        }

        let password_hash = self.hash_password(&password).await?;
        let user = self.user_repo.create(&username, &password_hash, &bio, &interests).await?;

        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        tracing::info!("User registered");

        let token = self.issue_token(user.id, &user.username)?;
        Ok(AuthenticatedUser { token, profile: user.into() })
    }

    #[tracing::instrument(skip(self, password), fields(user_id = tracing::field::Empty), err(level = "warn"))]
    pub async fn login(&self, username: String, password: String) -> Result<AuthenticatedUser> {
        let Some(user) = self.user_repo.find_by_username(&username).await? else {
            tracing::warn!("Login failed: user not found");
            return Err(AppError::Unauthenticated);
        };

        tracing::Span::current().record("user_id", tracing::field::display(user.id));

        if !self.verify_password(&password, &user.password_hash).await? {
            tracing::warn!("Login failed: invalid password");
            return Err(AppError::Unauthenticated);
        }

        self.user_repo.touch_last_seen(user.id).await?;

        let token = self.issue_token(user.id, &user.username)?;
        Ok(AuthenticatedUser { token, profile: user.into() })
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<Profile> {
        self.user_repo.find_profile(user_id).await?.ok_or(AppError::NotFound)
    }

    pub async fn update_profile(&self, user_id: Uuid, bio: String, interests: String) -> Result<Profile> {
        self.user_repo.update_profile(user_id, &bio, &interests).await?;
        self.profile(user_id).await
    }

    /// Refreshes the user's last-seen timestamp, e.g. on gateway connect.
    pub async fn touch_last_seen(&self, user_id: Uuid) -> Result<()> {
        self.user_repo.touch_last_seen(user_id).await
    }

    /// Verifies a bearer credential and returns the claims it carries.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        Claims::decode(token, &self.config.jwt_secret)
    }

    fn issue_token(&self, user_id: Uuid, handle: &str) -> Result<String> {
        Claims::new(user_id, handle.to_string(), self.config.token_ttl_days).encode(&self.config.jwt_secret)
    }

    async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || Password::hash(&password)).await.map_err(|_| AppError::Internal)?
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || Password::verify(&password, &password_hash))
            .await
            .map_err(|_| AppError::Internal)?
    }
}
