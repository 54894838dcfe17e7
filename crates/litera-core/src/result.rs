//! Convenience result type alias for Litera.

use crate::error::AppError;

/// Result alias used across all Litera crates.
pub type AppResult<T> = Result<T, AppError>;
