//! # litera-core
//!
//! Shared foundations for the Litera platform: the unified [`AppError`] type,
//! the [`AppResult`] alias, and the configuration schemas loaded from TOML
//! and environment variables.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
