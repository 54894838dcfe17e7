//! Authentication flows — login and registration.
//!
//! Both flows are synchronous from the caller's perspective. The only real
//! concurrency is the registration uniqueness check, which forks two
//! independent lookups and joins them; audit records run detached and never
//! touch the response path.

use std::sync::Arc;

use tracing::info;

use litera_core::error::AppError;
use litera_core::result::AppResult;
use litera_entity::account::{AccountSummary, CreateAccount, Role};
use litera_worker::runner::{TaskFuture, TaskRunner};

use crate::audit::{ACTION_LOGIN, ACTION_REGISTER, AuditSink};
use crate::password::PasswordHasher;
use crate::store::CredentialStore;
use crate::token::{SignedToken, TokenCodec};

/// Registration input, with the secret still in plaintext.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext secret (transport-secured).
    pub password: String,
    /// Display name.
    pub full_name: String,
}

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthenticationOutcome {
    /// The issued bearer token.
    pub token: SignedToken,
    /// Redacted view of the authenticated account.
    pub account: AccountSummary,
}

/// Orchestrates credential verification and account creation.
pub struct AuthService {
    /// Account backing store.
    store: Arc<dyn CredentialStore>,
    /// Audit trail sink.
    audit: Arc<dyn AuditSink>,
    /// Password hasher for registration.
    hasher: PasswordHasher,
    /// Token codec.
    codec: Arc<TokenCodec>,
    /// Concurrent task substrate.
    runner: Arc<TaskRunner>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("codec", &self.codec)
            .finish()
    }
}

impl AuthService {
    /// Creates a new authentication service.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        audit: Arc<dyn AuditSink>,
        hasher: PasswordHasher,
        codec: Arc<TokenCodec>,
        runner: Arc<TaskRunner>,
    ) -> Self {
        Self {
            store,
            audit,
            hasher,
            codec,
            runner,
        }
    }

    /// Verifies credentials and issues a token.
    ///
    /// Credential verification is delegated to the store and fails with one
    /// generic error whichever part of the credentials was wrong.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthenticationOutcome> {
        let verified = self.store.authenticate(username, password).await?;

        // The account can vanish between verification and resolution (race
        // with a concurrent deletion). Fatal, not retried.
        let account = self
            .store
            .find_by_username(&verified)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Account '{verified}' disappeared after credential verification"
                ))
            })?;

        let token = self.codec.issue(&account.username, account.role)?;
        info!(username = %account.username, "Login successful");
        self.spawn_audit(&account.username, ACTION_LOGIN);

        Ok(AuthenticationOutcome {
            token,
            account: AccountSummary::from(&account),
        })
    }

    /// Creates an account after validating identifier uniqueness, then issues
    /// a token for it.
    pub async fn register(&self, registration: Registration) -> AppResult<AuthenticationOutcome> {
        let Registration {
            username,
            email,
            password,
            full_name,
        } = registration;

        // Both checks run concurrently and both must resolve before any
        // write; neither short-circuits the other. Username conflicts take
        // precedence in the reported error when both identifiers are taken.
        let checks: Vec<TaskFuture<bool>> = vec![
            Box::pin({
                let store = Arc::clone(&self.store);
                let username = username.clone();
                async move { store.exists_by_username(&username).await }
            }),
            Box::pin({
                let store = Arc::clone(&self.store);
                let email = email.clone();
                async move { store.exists_by_email(&email).await }
            }),
        ];
        let taken = self.runner.run_concurrently(checks).await?;
        let (username_taken, email_taken) = (taken[0], taken[1]);

        if username_taken {
            return Err(AppError::conflict(format!(
                "Username '{username}' already exists"
            )));
        }
        if email_taken {
            return Err(AppError::conflict("Email already in use".to_string()));
        }

        let password_hash = self.hasher.hash(&password)?;

        // The store's uniqueness constraint is the final authority; a racing
        // registration that slipped past the pre-check surfaces here as the
        // same conflict error.
        let account = self
            .store
            .save(CreateAccount {
                username,
                email,
                password_hash,
                full_name,
                role: Role::User,
                is_active: true,
            })
            .await?;

        let token = self.codec.issue(&account.username, account.role)?;
        info!(username = %account.username, "New account registered");
        self.spawn_audit(&account.username, ACTION_REGISTER);

        Ok(AuthenticationOutcome {
            token,
            account: AccountSummary::from(&account),
        })
    }

    /// Emits a best-effort audit record without waiting for it.
    fn spawn_audit(&self, username: &str, action: &'static str) {
        let audit = Arc::clone(&self.audit);
        let username = username.to_string();
        self.runner.run_detached("audit", async move {
            audit.record(&username, action).await.map(|_| ())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use async_trait::async_trait;
    use litera_core::ErrorKind;
    use litera_core::config::AuthConfig;
    use litera_entity::account::Account;
    use litera_entity::audit::AuditEvent;
    use litera_worker::monitor::ExecutionMonitor;

    use crate::audit::MemoryAuditSink;
    use crate::store::MemoryCredentialStore;

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(&AuthConfig::default()).unwrap())
    }

    fn service(
        store: Arc<dyn CredentialStore>,
        audit: Arc<dyn AuditSink>,
    ) -> (AuthService, Arc<ExecutionMonitor>) {
        let monitor = Arc::new(ExecutionMonitor::new());
        let runner = Arc::new(TaskRunner::new(
            Arc::clone(&monitor),
            Duration::from_secs(5),
        ));
        (
            AuthService::new(store, audit, PasswordHasher::new(), codec(), runner),
            monitor,
        )
    }

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            full_name: "New User".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_issues_verifiable_token_with_user_role() {
        let store = Arc::new(MemoryCredentialStore::new());
        let audit = Arc::new(MemoryAuditSink::new());
        let (service, _) = service(store, Arc::clone(&audit) as Arc<dyn AuditSink>);

        let outcome = service
            .register(registration("newuser", "newuser@example.com"))
            .await
            .unwrap();

        assert_eq!(outcome.account.username, "newuser");
        assert_eq!(outcome.account.role, Role::User);
        assert!(!outcome.token.token.is_empty());
        assert!(codec().verify(&outcome.token.token, "newuser"));

        // The detached audit task settles on its own schedule.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let events = audit.recent(10).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, "REGISTER");
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username_even_with_novel_email() {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .insert_account("taken", "taken@example.com", "pw123456", "Taken", Role::User)
            .await
            .unwrap();
        let (service, _) = service(store, Arc::new(MemoryAuditSink::new()));

        let err = service
            .register(registration("taken", "fresh@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.contains("taken"));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email_with_novel_username() {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .insert_account("taken", "taken@example.com", "pw123456", "Taken", Role::User)
            .await
            .unwrap();
        let (service, _) = service(store, Arc::new(MemoryAuditSink::new()));

        let err = service
            .register(registration("fresh", "taken@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.contains("Email"));
    }

    #[tokio::test]
    async fn test_register_reports_username_before_email_when_both_taken() {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .insert_account("taken", "taken@example.com", "pw123456", "Taken", Role::User)
            .await
            .unwrap();
        let (service, _) = service(store, Arc::new(MemoryAuditSink::new()));

        let err = service
            .register(registration("taken", "taken@example.com"))
            .await
            .unwrap_err();

        assert!(err.message.contains("Username"));
    }

    #[tokio::test]
    async fn test_concurrent_same_username_registrations_yield_one_winner() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (service, _) = service(store, Arc::new(MemoryAuditSink::new()));
        let service = Arc::new(service);

        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .register(registration("popular", "first@example.com"))
                    .await
            })
        };
        let second = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .register(registration("popular", "second@example.com"))
                    .await
            })
        };

        let (first, second) = (first.await.unwrap(), second.await.unwrap());
        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let loser = if first.is_err() { first } else { second };
        assert_eq!(loser.unwrap_err().kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_login_returns_token_and_summary() {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .insert_account(
                "reader",
                "reader@example.com",
                "password123",
                "Avid Reader",
                Role::User,
            )
            .await
            .unwrap();
        let audit = Arc::new(MemoryAuditSink::new());
        let (service, _) = service(store, Arc::clone(&audit) as Arc<dyn AuditSink>);

        let outcome = service.login("reader", "password123").await.unwrap();

        assert_eq!(outcome.account.username, "reader");
        assert!(codec().verify(&outcome.token.token, "reader"));

        tokio::time::sleep(Duration::from_millis(100)).await;
        let events = audit.recent(10).await.unwrap();
        assert_eq!(events[0].action, "LOGIN");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .insert_account(
                "reader",
                "reader@example.com",
                "password123",
                "Avid Reader",
                Role::User,
            )
            .await
            .unwrap();
        let (service, _) = service(store, Arc::new(MemoryAuditSink::new()));

        let wrong_password = service.login("reader", "wrongpassword").await.unwrap_err();
        let unknown_user = service.login("nobody", "password123").await.unwrap_err();

        assert_eq!(wrong_password.kind, ErrorKind::Unauthorized);
        assert_eq!(wrong_password.kind, unknown_user.kind);
        assert_eq!(wrong_password.message, unknown_user.message);
    }

    #[tokio::test]
    async fn test_inactive_account_cannot_login() {
        let store = Arc::new(MemoryCredentialStore::new());
        store
            .insert_account(
                "dormant",
                "dormant@example.com",
                "password123",
                "Dormant",
                Role::User,
            )
            .await
            .unwrap();
        store.deactivate("dormant").await;
        let (service, _) = service(store, Arc::new(MemoryAuditSink::new()));

        let err = service.login("dormant", "password123").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    /// Store whose accounts vanish between credential verification and
    /// account resolution.
    struct VanishingStore(MemoryCredentialStore);

    #[async_trait]
    impl CredentialStore for VanishingStore {
        async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
            self.0.exists_by_username(username).await
        }
        async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
            self.0.exists_by_email(email).await
        }
        async fn find_by_username(&self, _username: &str) -> AppResult<Option<Account>> {
            Ok(None)
        }
        async fn authenticate(&self, identifier: &str, secret: &str) -> AppResult<String> {
            self.0.authenticate(identifier, secret).await
        }
        async fn save(&self, account: CreateAccount) -> AppResult<Account> {
            self.0.save(account).await
        }
    }

    #[tokio::test]
    async fn test_login_fails_fatally_when_account_vanishes_mid_flow() {
        let inner = MemoryCredentialStore::new();
        inner
            .insert_account(
                "ghost",
                "ghost@example.com",
                "password123",
                "Ghost",
                Role::User,
            )
            .await
            .unwrap();
        let (service, _) = service(
            Arc::new(VanishingStore(inner)),
            Arc::new(MemoryAuditSink::new()),
        );

        let err = service.login("ghost", "password123").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }

    /// Audit sink that always fails.
    struct FailingAuditSink;

    #[async_trait]
    impl AuditSink for FailingAuditSink {
        async fn record(&self, _username: &str, _action: &str) -> AppResult<AuditEvent> {
            Err(AppError::database("audit store unavailable"))
        }
        async fn recent(&self, _limit: i64) -> AppResult<Vec<AuditEvent>> {
            Err(AppError::database("audit store unavailable"))
        }
    }

    #[tokio::test]
    async fn test_audit_failure_never_reaches_the_caller() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (service, monitor) = service(store, Arc::new(FailingAuditSink));

        let outcome = service
            .register(registration("newuser", "newuser@example.com"))
            .await;
        assert!(outcome.is_ok());

        // The failure is counted, not surfaced.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(monitor.snapshot().tasks_failed, 1);
    }
}
