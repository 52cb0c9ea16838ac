//! `bookstore-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. Claims
//! validation is deterministic; the only token mechanics here are HS256
//! encode/decode of the claims document.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, AuthzError, Principal};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use jwt::{Hs256Jwt, JwtValidator, TokenError};
pub use permissions::Permission;
pub use principal::PrincipalId;
pub use roles::Role;
