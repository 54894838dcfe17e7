//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::Role;

/// A registered account in the Litera platform.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Human-readable display name.
    pub full_name: String,
    /// Granted role.
    pub role: Role,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Soft-deletion marker. A non-null value hides the account from every
    /// lookup; rows are never physically deleted by this core.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Check whether this account may currently be authenticated against.
    pub fn can_authenticate(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Assigned role.
    pub role: Role,
    /// Whether the account starts active.
    pub is_active: bool,
}

/// Redacted account view returned to callers. Never carries the credential
/// secret in any form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account identifier.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Granted role.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            role: account.role,
            created_at: account.created_at,
        }
    }
}
