//! Credential store port.
//!
//! The authentication flows and the request gate talk to accounts only
//! through this trait; the SQL backend is the production implementation and
//! the in-memory backend serves tests and demos.

pub mod memory;
pub mod sql;

use async_trait::async_trait;

use litera_core::error::AppError;
use litera_core::result::AppResult;
use litera_entity::account::{Account, CreateAccount};

pub use memory::MemoryCredentialStore;
pub use sql::SqlCredentialStore;

/// Port to the account backing store.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Whether a visible account with this username exists.
    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    /// Whether a visible account with this email exists.
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Resolve a visible account by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// Verify credentials and return the canonical username of the verified
    /// identity.
    ///
    /// Fails with one generic error whatever was wrong — an unknown
    /// identifier and a wrong secret are indistinguishable to the caller.
    async fn authenticate(&self, identifier: &str, secret: &str) -> AppResult<String>;

    /// Persist a new account, assigning its identity and creation timestamp.
    ///
    /// A uniqueness violation surfaces as the same conflict error the
    /// registration pre-check produces.
    async fn save(&self, account: CreateAccount) -> AppResult<Account>;
}

/// The single credential failure returned for every authentication mismatch.
pub(crate) fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid username or password")
}
