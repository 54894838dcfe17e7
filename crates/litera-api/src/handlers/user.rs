//! User handlers — the current principal and the role demonstration routes.

use axum::Json;
use axum::extract::State;

use litera_core::result::AppResult;

use crate::dto::response::{MessageResponse, PrincipalResponse};
use crate::extractors::MaybeUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    MaybeUser(principal): MaybeUser,
) -> AppResult<Json<PrincipalResponse>> {
    let principal = state
        .policy
        .authorize_principal("users.me", principal.as_ref())?;
    Ok(Json(PrincipalResponse::from(principal)))
}

/// GET /api/users/admin-only
pub async fn admin_only(
    State(state): State<AppState>,
    MaybeUser(principal): MaybeUser,
) -> AppResult<Json<MessageResponse>> {
    state
        .policy
        .authorize("users.admin_only", principal.as_ref())?;
    Ok(Json(MessageResponse {
        message: "Admin access confirmed.".to_string(),
    }))
}

/// GET /api/users/user-only
pub async fn user_only(
    State(state): State<AppState>,
    MaybeUser(principal): MaybeUser,
) -> AppResult<Json<MessageResponse>> {
    state
        .policy
        .authorize("users.user_only", principal.as_ref())?;
    Ok(Json(MessageResponse {
        message: "User access confirmed.".to_string(),
    }))
}
