//! In-memory credential store.
//!
//! Backs tests and demos; behaves like the SQL store, including the
//! soft-deletion filter and the atomic uniqueness check on save.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use litera_core::error::AppError;
use litera_core::result::AppResult;
use litera_entity::account::{Account, CreateAccount, Role};

use crate::password::PasswordHasher;

use super::{CredentialStore, invalid_credentials};

/// Credential store holding accounts in process memory.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    /// Password hasher for credential comparison.
    hasher: PasswordHasher,
    /// All accounts, including soft-deleted ones.
    accounts: Mutex<Vec<Account>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an account directly, hashing the given plaintext secret.
    pub async fn insert_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
    ) -> AppResult<Account> {
        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: self.hasher.hash(password)?,
            full_name: full_name.to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
            deleted_at: None,
        };
        self.accounts.lock().await.push(account.clone());
        Ok(account)
    }

    /// Marks an account inactive.
    pub async fn deactivate(&self, username: &str) {
        let mut accounts = self.accounts.lock().await;
        if let Some(account) = accounts
            .iter_mut()
            .find(|a| a.username.eq_ignore_ascii_case(username))
        {
            account.is_active = false;
        }
    }

    /// Soft-deletes an account, hiding it from every lookup.
    pub async fn soft_delete(&self, username: &str) {
        let mut accounts = self.accounts.lock().await;
        if let Some(account) = accounts
            .iter_mut()
            .find(|a| a.username.eq_ignore_ascii_case(username))
        {
            account.deleted_at = Some(Utc::now());
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .iter()
            .any(|a| a.deleted_at.is_none() && a.username.eq_ignore_ascii_case(username)))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .iter()
            .any(|a| a.deleted_at.is_none() && a.email.eq_ignore_ascii_case(email)))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .iter()
            .find(|a| a.deleted_at.is_none() && a.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn authenticate(&self, identifier: &str, secret: &str) -> AppResult<String> {
        let account = self.find_by_username(identifier).await?;

        let Some(account) = account else {
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

    async fn save(&self, data: CreateAccount) -> AppResult<Account> {
        // Check-and-insert under one lock: this is the store-level uniqueness
        // authority the flows rely on under concurrent registration.
        let mut accounts = self.accounts.lock().await;

        if accounts
            .iter()
            .any(|a| a.deleted_at.is_none() && a.username.eq_ignore_ascii_case(&data.username))
        {
            return Err(AppError::conflict(format!(
                "Username '{}' already exists",
                data.username
            )));
        }
        if accounts
            .iter()
            .any(|a| a.deleted_at.is_none() && a.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(AppError::conflict("Email already in use".to_string()));
        }

        let account = Account {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            full_name: data.full_name,
            role: data.role,
            is_active: data.is_active,
            created_at: Utc::now(),
            deleted_at: None,
        };
        accounts.push(account.clone());
        Ok(account)
    }
}
