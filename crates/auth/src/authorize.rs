use std::collections::HashSet;

use thiserror::Error;

use crate::{Permission, PrincipalId, Role};

/// A fully resolved principal for authorization decisions.
///
/// Construction is decoupled from storage and transport: the API layer
/// derives permissions from the token's role and its policy mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub role: Role,
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize a principal against a required permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms: HashSet<&str> = principal.permissions.iter().map(|p| p.as_str()).collect();

    if perms.contains("*") || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(perms: &[&'static str]) -> Principal {
        Principal {
            principal_id: PrincipalId::new(),
            role: Role::CUSTOMER,
            permissions: perms.iter().map(|p| Permission::new(*p)).collect(),
        }
    }

    #[test]
    fn wildcard_grants_everything() {
        let p = principal(&["*"]);
        assert!(authorize(&p, &Permission::new("books.write")).is_ok());
    }

    #[test]
    fn explicit_permission_grants() {
        let p = principal(&["books.read"]);
        assert!(authorize(&p, &Permission::new("books.read")).is_ok());
    }

    #[test]
    fn missing_permission_is_forbidden() {
        let p = principal(&["books.read"]);
        let err = authorize(&p, &Permission::new("books.write")).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("books.write".to_string()));
    }
}
