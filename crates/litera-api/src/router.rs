//! Route definitions for the Litera HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! authentication gate wraps the whole tree; rejection decisions belong to
//! the access policy inside the handlers.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(admin_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate_request,
        ))
        .with_state(state)
}

/// Auth endpoints: register, login, validate.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/validate", get(handlers::auth::validate))
}

/// User endpoints: current principal and role demonstration routes.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::me))
        .route("/users/admin-only", get(handlers::user::admin_only))
        .route("/users/user-only", get(handlers::user::user_only))
}

/// Admin endpoints.
fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/audit", get(handlers::admin::recent_audit))
}

/// Unprotected liveness probe.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
