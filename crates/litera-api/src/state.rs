//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use litera_auth::audit::AuditSink;
use litera_auth::flow::AuthService;
use litera_auth::rbac::AccessPolicy;
use litera_auth::store::CredentialStore;
use litera_auth::token::TokenCodec;
use litera_core::config::AppConfig;
use litera_worker::monitor::ExecutionMonitor;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Token codec used by the gate.
    pub codec: Arc<TokenCodec>,
    /// Credential store used by the gate for account resolution.
    pub store: Arc<dyn CredentialStore>,
    /// Audit trail (read side for the admin listing).
    pub audit: Arc<dyn AuditSink>,
    /// Login and registration flows.
    pub auth_service: Arc<AuthService>,
    /// Central operation -> required-role table.
    pub policy: Arc<AccessPolicy>,
    /// Task execution counters.
    pub monitor: Arc<ExecutionMonitor>,
}
