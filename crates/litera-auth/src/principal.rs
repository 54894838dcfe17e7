//! The per-request authenticated identity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use litera_entity::account::{Account, Role};

/// The resolved identity attached to a single request.
///
/// Created once per request by the authentication gate and carried as an
/// explicit value through the call chain; never persisted and never shared
/// across requests.
#[derive(Debug, Clone)]
pub struct Principal {
    /// The authenticated account's ID.
    pub account_id: Uuid,
    /// The authenticated account's username.
    pub username: String,
    /// The granted role.
    pub role: Role,
    /// When this request was authenticated.
    pub authenticated_at: DateTime<Utc>,
}

impl Principal {
    /// Creates a principal from a resolved account.
    pub fn from_account(account: &Account) -> Self {
        Self {
            account_id: account.id,
            username: account.username.clone(),
            role: account.role,
            authenticated_at: Utc::now(),
        }
    }

    /// Returns whether the principal holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
