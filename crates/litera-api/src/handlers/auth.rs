//! Auth handlers — register, login, validate.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use litera_auth::flow::Registration;
use litera_core::error::AppError;
use litera_core::result::AppResult;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::AuthResponse;
use crate::extractors::MaybeUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid registration request: {e}")))?;

    tracing::info!(username = %req.username, "Registration requested");

    let outcome = state
        .auth_service
        .register(Registration {
            username: req.username,
            email: req.email,
            password: req.password,
            full_name: req.full_name,
        })
        .await?;

    Ok(Json(AuthResponse::from(outcome)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid login request: {e}")))?;

    tracing::info!(username = %req.username, "Login requested");

    let outcome = state.auth_service.login(&req.username, &req.password).await?;

    Ok(Json(AuthResponse::from(outcome)))
}

/// GET /api/auth/validate
///
/// Plain confirmation that the presented token is alive; the policy turns an
/// unauthenticated request into a 401.
pub async fn validate(
    State(state): State<AppState>,
    MaybeUser(principal): MaybeUser,
) -> AppResult<String> {
    state.policy.authorize("auth.validate", principal.as_ref())?;
    Ok("Token is valid.".to_string())
}
