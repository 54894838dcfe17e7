//! Audit trail sink.
//!
//! Audit records are best-effort: the flows emit them through detached
//! tasks and a failed write can never reach the caller.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use litera_core::result::AppResult;
use litera_database::repositories::AuditRepository;
use litera_entity::audit::AuditEvent;

/// Action name recorded for successful logins.
pub const ACTION_LOGIN: &str = "LOGIN";
/// Action name recorded for successful registrations.
pub const ACTION_REGISTER: &str = "REGISTER";

/// Port to the audit trail.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record an account activity event.
    async fn record(&self, username: &str, action: &str) -> AppResult<AuditEvent>;

    /// List the most recent events, newest first.
    async fn recent(&self, limit: i64) -> AppResult<Vec<AuditEvent>>;
}

/// Audit sink over the audit_log table.
#[derive(Debug, Clone)]
pub struct SqlAuditSink {
    repo: Arc<AuditRepository>,
}

impl SqlAuditSink {
    /// Creates a new SQL audit sink.
    pub fn new(repo: Arc<AuditRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AuditSink for SqlAuditSink {
    async fn record(&self, username: &str, action: &str) -> AppResult<AuditEvent> {
        self.repo.record(username, action).await
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<AuditEvent>> {
        self.repo.recent(limit).await
    }
}

/// In-memory audit sink for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, username: &str, action: &str) -> AppResult<AuditEvent> {
        let event = AuditEvent {
            id: Uuid::new_v4(),
            username: username.to_string(),
            action: action.to_string(),
            recorded_at: Utc::now(),
        };
        self.events.lock().await.push(event.clone());
        Ok(event)
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<AuditEvent>> {
        let events = self.events.lock().await;
        Ok(events.iter().rev().take(limit as usize).cloned().collect())
    }
}
