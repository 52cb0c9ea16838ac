//! API-side authorization guard.
//!
//! Role → permission mapping lives here, at the boundary; stores and the
//! checkout orchestrator stay auth-agnostic. Handlers call
//! [`require_permission`] before touching any store.

use bookstore_auth::{authorize, AuthzError, Permission, Principal, Role};

use crate::context::PrincipalContext;

/// Check authorization for the current request context.
pub fn require_permission(
    principal: &PrincipalContext,
    permission: &'static str,
) -> Result<(), AuthzError> {
    let resolved = Principal {
        principal_id: principal.principal_id(),
        role: principal.role().clone(),
        permissions: permissions_for_role(principal.role()),
    };

    authorize(&resolved, &Permission::new(permission))
}

/// Role → permission mapping.
///
/// Mirrors the role annotations of the caller-facing surface: SuperAdmin can
/// do everything; Admin everything except mutating the admin directory;
/// Customer reads the catalog, writes reviews, sees own orders, and checks
/// out.
fn permissions_for_role(role: &Role) -> Vec<Permission> {
    if *role == Role::SUPER_ADMIN {
        return vec![Permission::new("*")];
    }

    if *role == Role::ADMIN {
        return vec![
            Permission::new("books.read"),
            Permission::new("books.write"),
            Permission::new("authors.read"),
            Permission::new("authors.write"),
            Permission::new("categories.read"),
            Permission::new("categories.write"),
            Permission::new("customers.read"),
            Permission::new("customers.write"),
            Permission::new("customers.manage"),
            Permission::new("reviews.read"),
            Permission::new("reviews.respond"),
            Permission::new("reviews.delete"),
            Permission::new("orders.read"),
            Permission::new("orders.list"),
            Permission::new("orders.delete"),
            Permission::new("admins.read"),
            Permission::new("admins.create"),
        ];
    }

    if *role == Role::CUSTOMER {
        return vec![
            Permission::new("books.read"),
            Permission::new("authors.read"),
            Permission::new("categories.read"),
            Permission::new("customers.write"),
            Permission::new("reviews.read"),
            Permission::new("reviews.write"),
            Permission::new("reviews.delete"),
            Permission::new("orders.read"),
            Permission::new("checkout.execute"),
        ];
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_auth::PrincipalId;

    fn ctx(role: Role) -> PrincipalContext {
        PrincipalContext::new(PrincipalId::new(), role)
    }

    #[test]
    fn super_admin_can_mutate_admins() {
        assert!(require_permission(&ctx(Role::SUPER_ADMIN), "admins.write").is_ok());
    }

    #[test]
    fn admin_cannot_mutate_admins() {
        assert!(require_permission(&ctx(Role::ADMIN), "admins.write").is_err());
        assert!(require_permission(&ctx(Role::ADMIN), "admins.create").is_ok());
    }

    #[test]
    fn customer_can_checkout_but_not_write_books() {
        let ctx = ctx(Role::CUSTOMER);
        assert!(require_permission(&ctx, "checkout.execute").is_ok());
        assert!(require_permission(&ctx, "books.write").is_err());
    }

    #[test]
    fn unknown_role_has_no_permissions() {
        assert!(require_permission(&ctx(Role::new("Visitor")), "books.read").is_err());
    }
}
