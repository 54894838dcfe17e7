//! Audit trail event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A recorded account activity ("LOGIN", "REGISTER").
///
/// Written fire-and-forget by the authentication flows; a lost event never
/// affects the flow that emitted it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// Username of the acting account.
    pub username: String,
    /// Action name.
    pub action: String,
    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,
}
