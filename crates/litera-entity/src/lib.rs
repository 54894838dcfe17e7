//! Domain entities for the Litera platform.
//!
//! - `account` — registered accounts, their roles, and redacted summaries
//! - `audit` — audit trail events recorded by the authentication flows

pub mod account;
pub mod audit;

pub use account::{Account, AccountSummary, CreateAccount, Role};
pub use audit::AuditEvent;
