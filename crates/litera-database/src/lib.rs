//! PostgreSQL persistence layer for Litera.
//!
//! Provides the connection pool wrapper and the repositories the auth core
//! reads and writes through. Schema management is an external concern; the
//! repositories assume the `accounts` and `audit_log` tables exist.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
