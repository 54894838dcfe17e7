//! Request authentication gate.
//!
//! Runs once per inbound request, before any protected handler. A request
//! that arrives without a usable bearer token proceeds unauthenticated; the
//! downstream access policy decides whether that is acceptable. The gate
//! itself never rejects a request — it fails open to unauthenticated, never
//! to authenticated.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use litera_auth::principal::Principal;
use litera_auth::store::CredentialStore;

use crate::state::AppState;

/// Bearer scheme prefix in the Authorization header.
const BEARER_PREFIX: &str = "Bearer ";

/// Establishes the request's principal from the Authorization header.
pub async fn authenticate_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<Principal>().is_none() {
        if let Some(principal) = resolve_principal(&state, request.headers()).await {
            tracing::debug!(username = %principal.username, "Request authenticated");
            request.extensions_mut().insert(principal);
        }
    }

    next.run(request).await
}

/// Resolves a principal from the bearer token, or `None` on any failure.
///
/// Every failure path leaves the request unauthenticated: a malformed or
/// stale token must never silently grant identity, and an absent token must
/// never halt processing here.
async fn resolve_principal(state: &AppState, headers: &HeaderMap) -> Option<Principal> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(BEARER_PREFIX)?;

    let subject = match state.codec.parse_subject(token) {
        Ok(subject) => subject,
        Err(e) => {
            tracing::debug!(error = %e, "Could not extract subject from bearer token");
            return None;
        }
    };

    let account = match state.store.find_by_username(&subject).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            tracing::debug!(subject = %subject, "Token subject has no matching account");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Account lookup failed during request authentication");
            return None;
        }
    };

    if !account.can_authenticate() {
        tracing::debug!(subject = %subject, "Account is inactive or deleted");
        return None;
    }

    // Full verification against the resolved identity: signature, exact
    // subject match, and expiry.
    if !state.codec.verify(token, &account.username) {
        tracing::debug!(subject = %subject, "Bearer token failed verification");
        return None;
    }

    Some(Principal::from_account(&account))
}
