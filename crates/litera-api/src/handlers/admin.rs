//! Admin handlers.

use axum::Json;
use axum::extract::State;

use litera_auth::audit::AuditSink;
use litera_core::result::AppResult;

use crate::dto::response::AuditEventResponse;
use crate::extractors::MaybeUser;
use crate::state::AppState;

/// Number of audit events returned by the listing.
const AUDIT_PAGE_SIZE: i64 = 50;

/// GET /api/admin/audit
pub async fn recent_audit(
    State(state): State<AppState>,
    MaybeUser(principal): MaybeUser,
) -> AppResult<Json<Vec<AuditEventResponse>>> {
    state.policy.authorize("admin.audit", principal.as_ref())?;

    let events = state.audit.recent(AUDIT_PAGE_SIZE).await?;
    Ok(Json(events.into_iter().map(AuditEventResponse::from).collect()))
}
