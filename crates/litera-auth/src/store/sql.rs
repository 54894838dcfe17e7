//! PostgreSQL-backed credential store.

use std::sync::Arc;

use async_trait::async_trait;

use litera_core::result::AppResult;
use litera_database::repositories::AccountRepository;
use litera_entity::account::{Account, CreateAccount};

use crate::password::PasswordHasher;

use super::{CredentialStore, invalid_credentials};

/// Credential store over the accounts table.
#[derive(Debug, Clone)]
pub struct SqlCredentialStore {
    /// Account repository.
    accounts: Arc<AccountRepository>,
    /// Password hasher for credential comparison.
    hasher: PasswordHasher,
}

impl SqlCredentialStore {
    /// Creates a new SQL credential store.
    pub fn new(accounts: Arc<AccountRepository>, hasher: PasswordHasher) -> Self {
        Self { accounts, hasher }
    }
}

#[async_trait]
impl CredentialStore for SqlCredentialStore {
    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        self.accounts.exists_by_username(username).await
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        self.accounts.exists_by_email(email).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        self.accounts.find_by_username(username).await
    }

    async fn authenticate(&self, identifier: &str, secret: &str) -> AppResult<String> {
        // Infrastructure failures propagate loudly; only credential
        // mismatches collapse into the generic error.
        let Some(account) = self.accounts.find_by_username(identifier).await? else {
            return Err(invalid_credentials());
        };

        if !account.can_authenticate() {
            return Err(invalid_credentials());
        }

        if !self.hasher.verify(secret, &account.password_hash)? {
            return Err(invalid_credentials());
        }

        Ok(account.username)
    }

    async fn save(&self, account: CreateAccount) -> AppResult<Account> {
        self.accounts.create(&account).await
    }
}
