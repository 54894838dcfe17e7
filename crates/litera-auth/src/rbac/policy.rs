//! Declarative operation -> required-role policy.
//!
//! One table maps every protected operation to its access requirement, and
//! one `authorize` call evaluates it. Missing principal and insufficient
//! role are distinct failures (401 vs 403 upstream). Role matching is exact
//! set membership: an admin does not implicitly satisfy a user-only rule.

use std::collections::HashMap;

use litera_core::error::AppError;
use litera_core::result::AppResult;
use litera_entity::account::Role;

use crate::principal::Principal;

/// Access requirement for a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No authentication required.
    Public,
    /// Any authenticated principal.
    Authenticated,
    /// A principal holding exactly this role.
    Role(Role),
}

/// The operation -> access table consulted on every protected request.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: HashMap<&'static str, Access>,
}

impl AccessPolicy {
    /// Creates the policy with the default rule set.
    pub fn new() -> Self {
        let mut rules = HashMap::new();
        rules.insert("auth.register", Access::Public);
        rules.insert("auth.login", Access::Public);
        rules.insert("auth.validate", Access::Authenticated);
        rules.insert("users.me", Access::Authenticated);
        rules.insert("users.user_only", Access::Role(Role::User));
        rules.insert("users.admin_only", Access::Role(Role::Admin));
        rules.insert("admin.audit", Access::Role(Role::Admin));
        Self { rules }
    }

    /// Registers or replaces a rule.
    pub fn insert(&mut self, operation: &'static str, access: Access) {
        self.rules.insert(operation, access);
    }

    /// Evaluates the access rule for `operation` against the principal.
    ///
    /// An operation with no registered rule is a programming error and is
    /// denied outright.
    pub fn authorize(&self, operation: &str, principal: Option<&Principal>) -> AppResult<()> {
        let access = self.rules.get(operation).ok_or_else(|| {
            AppError::internal(format!(
                "No access rule registered for operation '{operation}'"
            ))
        })?;

        match access {
            Access::Public => Ok(()),
            Access::Authenticated => {
                principal.ok_or_else(|| AppError::unauthorized("Authentication required"))?;
                Ok(())
            }
            Access::Role(required) => {
                let principal =
                    principal.ok_or_else(|| AppError::unauthorized("Authentication required"))?;
                if principal.role == *required {
                    Ok(())
                } else {
                    Err(AppError::forbidden(format!(
                        "Operation '{operation}' requires role {required}"
                    )))
                }
            }
        }
    }

    /// Like [`authorize`](Self::authorize), but also hands back the principal
    /// for handlers that need the identity. Only meaningful for non-public
    /// operations.
    pub fn authorize_principal<'p>(
        &self,
        operation: &str,
        principal: Option<&'p Principal>,
    ) -> AppResult<&'p Principal> {
        self.authorize(operation, principal)?;
        principal.ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new()
    }
}
