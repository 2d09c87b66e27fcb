use crate::api::AppState;
use crate::api::middleware::AuthUser;
use crate::api::schemas::matches::{CandidateList, MatchList};
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};

/// Ranked, threshold-filtered candidates for the caller.
pub async fn candidates(auth_user: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let ranked = state.match_service.ranked_candidates(auth_user.user_id).await?;

    Ok(Json(CandidateList { candidates: ranked.into_iter().map(Into::into).collect() }))
}

/// Every match record the caller participates in.
pub async fn list_matches(auth_user: AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let records = state.match_service.list_matches(auth_user.user_id).await?;

    Ok(Json(MatchList { matches: records.into_iter().map(Into::into).collect() }))
}
