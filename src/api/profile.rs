use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::profile::{ProfileResponse, ProfileUpdate};
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};

pub async fn get_me(auth_user: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let profile = state.account_service.profile(auth_user.user_id).await?;
    Ok(Json(ProfileResponse { user: profile.into() }))
}

pub async fn update_me(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<impl IntoResponse> {
    let profile =
        state.account_service.update_profile(auth_user.user_id, payload.bio, payload.interests).await?;
    Ok(Json(ProfileResponse { user: profile.into() }))
}
