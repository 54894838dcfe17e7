//! Audit log repository implementation.

use sqlx::PgPool;

use litera_core::error::{AppError, ErrorKind};
use litera_core::result::AppResult;
use litera_entity::audit::AuditEvent;

/// Repository for audit trail events.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    /// Create a new audit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an account activity event.
    pub async fn record(&self, username: &str, action: &str) -> AppResult<AuditEvent> {
        sqlx::query_as::<_, AuditEvent>(
            "INSERT INTO audit_log (username, action) VALUES ($1, $2) RETURNING *",
        )
        .bind(username)
        .bind(action)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record audit event", e))
    }

    /// List the most recent audit events, newest first.
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<AuditEvent>> {
        sqlx::query_as::<_, AuditEvent>(
            "SELECT * FROM audit_log ORDER BY recorded_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list audit events", e))
    }
}
