//! Shared test helpers driving the real router over the in-memory store.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use litera_api::state::AppState;
use litera_auth::audit::{AuditSink, MemoryAuditSink};
use litera_auth::flow::AuthService;
use litera_auth::password::PasswordHasher;
use litera_auth::rbac::AccessPolicy;
use litera_auth::store::{CredentialStore, MemoryCredentialStore};
use litera_auth::token::{Claims, TokenCodec};
use litera_core::config::app::ServerConfig;
use litera_core::config::auth::AuthConfig;
use litera_core::config::logging::LoggingConfig;
use litera_core::config::monitor::MonitorConfig;
use litera_core::config::{AppConfig, DatabaseConfig};
use litera_entity::account::Role;
use litera_worker::monitor::ExecutionMonitor;
use litera_worker::runner::TaskRunner;

/// Test application context: the real router wired over in-memory backends.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// The in-memory credential store behind the router.
    pub store: Arc<MemoryCredentialStore>,
    /// The in-memory audit sink behind the router.
    pub audit: Arc<MemoryAuditSink>,
    /// Application config.
    pub config: AppConfig,
}

/// A drained HTTP response.
pub struct TestResponse {
    /// Response status.
    pub status: StatusCode,
    /// JSON body, or `Null` for non-JSON responses.
    pub body: Value,
    /// Raw body text.
    pub text: String,
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        auth: AuthConfig::default(),
        monitor: MonitorConfig::default(),
        logging: LoggingConfig::default(),
    }
}

impl TestApp {
    /// Create a new test application.
    pub fn new() -> Self {
        let config = test_config();
        let store = Arc::new(MemoryCredentialStore::new());
        let audit = Arc::new(MemoryAuditSink::new());
        let codec = Arc::new(TokenCodec::new(&config.auth).expect("test codec"));
        let monitor = Arc::new(ExecutionMonitor::new());
        let runner = Arc::new(TaskRunner::new(
            Arc::clone(&monitor),
            Duration::from_secs(config.auth.uniqueness_check_timeout_seconds),
        ));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&store) as Arc<dyn CredentialStore>,
            Arc::clone(&audit) as Arc<dyn AuditSink>,
            PasswordHasher::new(),
            Arc::clone(&codec),
            runner,
        ));

        let state = AppState {
            config: Arc::new(config.clone()),
            codec,
            store: Arc::clone(&store) as Arc<dyn CredentialStore>,
            audit: Arc::clone(&audit) as Arc<dyn AuditSink>,
            auth_service,
            policy: Arc::new(AccessPolicy::new()),
            monitor,
        };

        Self {
            router: litera_api::router::build_router(state),
            store,
            audit,
            config,
        }
    }

    /// Issue a request against the router and drain the response.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }

    /// Insert an account directly into the backing store.
    pub async fn create_account(&self, username: &str, password: &str, role: Role) {
        self.store
            .insert_account(
                username,
                &format!("{username}@example.com"),
                password,
                "Test Account",
                role,
            )
            .await
            .expect("failed to insert test account");
    }

    /// Log in through the API and return the issued token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({
                    "username": username,
                    "password": password,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response
            .body
            .get("token")
            .and_then(|t| t.as_str())
            .expect("login response carried no token")
            .to_string()
    }

    /// Craft a token signed with the app's secret that expired an hour ago.
    pub fn expired_token(&self, subject: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            role: Role::User,
            iat: now - 7200,
            exp: now - 3600,
        };
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(self.config.auth.token_secret.as_bytes()),
        )
        .expect("failed to encode expired token")
    }
}

/// Flip the last character of a compact token, corrupting its signature.
pub fn tamper(token: &str) -> String {
    let mut bytes = token.as_bytes().to_vec();
    let last = bytes.last_mut().unwrap();
    *last = if *last == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).unwrap()
}
