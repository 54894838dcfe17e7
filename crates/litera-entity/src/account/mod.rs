//! Account entity and role enumeration.

pub mod model;
pub mod role;

pub use model::{Account, AccountSummary, CreateAccount};
pub use role::Role;
