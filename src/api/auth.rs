use crate::api::AppState;
use crate::api::schemas::auth::{AuthResponse, Login, Registration};
use crate::error::Result;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Registration>,
) -> Result<impl IntoResponse> {
    let authed = state
        .account_service
        .register(payload.username, payload.password, payload.bio, payload.interests)
        .await?;

    let response = AuthResponse { token: authed.token, user: authed.profile.into() };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(State(state): State<AppState>, Json(payload): Json<Login>) -> Result<impl IntoResponse> {
    let authed = state.account_service.login(payload.username, payload.password).await?;

    let response = AuthResponse { token: authed.token, user: authed.profile.into() };
    Ok(Json(response))
}
