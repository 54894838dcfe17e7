//! Account repository implementation.
//!
//! Every query filters on `deleted_at IS NULL`: soft-deleted rows are
//! invisible to the auth core.

use sqlx::PgPool;

use litera_core::error::{AppError, ErrorKind};
use litera_core::result::AppResult;
use litera_entity::account::{Account, CreateAccount};

/// Repository for account lookups and creation.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE LOWER(username) = LOWER($1) AND deleted_at IS NULL",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find account by username", e)
        })
    }

    /// Check whether a non-deleted account with the given username exists.
    pub async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts \
             WHERE LOWER(username) = LOWER($1) AND deleted_at IS NULL)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check username existence", e)
        })
    }

    /// Check whether a non-deleted account with the given email exists.
    pub async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts \
             WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check email existence", e)
        })
    }

    /// Create a new account.
    ///
    /// The storage-layer uniqueness constraints are the final authority on
    /// duplicate identifiers; a violation surfaces as the same conflict error
    /// the pre-check produces, so callers cannot tell the two paths apart.
    pub async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (username, email, password_hash, full_name, role, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.full_name)
        .bind(data.role)
        .bind(data.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("accounts_username_key") =>
            {
                AppError::conflict(format!("Username '{}' already exists", data.username))
            }
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("accounts_email_key") =>
            {
                AppError::conflict("Email already in use".to_string())
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create account", e),
        })
    }
}
