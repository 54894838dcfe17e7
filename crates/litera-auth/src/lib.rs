//! # litera-auth
//!
//! The authentication and authorization core of the Litera platform.
//!
//! ## Modules
//!
//! - `token` — signed bearer token issuance and verification
//! - `password` — Argon2id password hashing
//! - `store` — the credential store port and its SQL/in-memory backends
//! - `audit` — fire-and-forget audit trail sink
//! - `flow` — the login and registration flows
//! - `principal` — the per-request authenticated identity
//! - `rbac` — the declarative operation -> required-role policy

pub mod audit;
pub mod flow;
pub mod password;
pub mod principal;
pub mod rbac;
pub mod store;
pub mod token;

pub use audit::{AuditSink, MemoryAuditSink, SqlAuditSink};
pub use flow::{AuthService, AuthenticationOutcome, Registration};
pub use password::PasswordHasher;
pub use principal::Principal;
pub use rbac::{Access, AccessPolicy};
pub use store::{CredentialStore, MemoryCredentialStore, SqlCredentialStore};
pub use token::{Claims, SignedToken, TokenCodec};
