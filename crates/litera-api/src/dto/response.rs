//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use litera_auth::flow::AuthenticationOutcome;
use litera_auth::principal::Principal;
use litera_entity::audit::AuditEvent;

/// Body returned by login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The issued bearer token.
    pub token: String,
    /// Token scheme, always `"Bearer"`.
    #[serde(rename = "type")]
    pub token_type: String,
    /// Username of the authenticated account.
    pub username: String,
    /// Email of the authenticated account.
    pub email: String,
    /// Display name.
    #[serde(rename = "fullName")]
    pub full_name: String,
    /// Granted role, uppercase.
    pub role: String,
}

impl From<AuthenticationOutcome> for AuthResponse {
    fn from(outcome: AuthenticationOutcome) -> Self {
        Self {
            token: outcome.token.token,
            token_type: "Bearer".to_string(),
            username: outcome.account.username,
            email: outcome.account.email,
            full_name: outcome.account.full_name,
            role: outcome.account.role.to_string(),
        }
    }
}

/// The authenticated identity as seen by the current request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    /// Account identifier.
    pub account_id: Uuid,
    /// Username.
    pub username: String,
    /// Granted role, uppercase.
    pub role: String,
    /// When this request was authenticated.
    pub authenticated_at: DateTime<Utc>,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            account_id: principal.account_id,
            username: principal.username.clone(),
            role: principal.role.to_string(),
            authenticated_at: principal.authenticated_at,
        }
    }
}

/// A recorded audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEventResponse {
    /// Event identifier.
    pub id: Uuid,
    /// Acting account's username.
    pub username: String,
    /// Action name.
    pub action: String,
    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl From<AuditEvent> for AuditEventResponse {
    fn from(event: AuditEvent) -> Self {
        Self {
            id: event.id,
            username: event.username,
            action: event.action,
            recorded_at: event.recorded_at,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Liveness probe response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process is serving.
    pub status: String,
}
