//! HS256 encode/decode of the claims document.
//!
//! Token *mechanics* stop at the claims contract: signature + the
//! deterministic time-window checks in [`crate::claims`]. Expiry is encoded
//! in the claims themselves, so the library-level `exp` handling is disabled
//! and `validate_claims` is the single source of truth.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{validate_claims, JwtClaims, TokenValidationError};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is malformed or has a bad signature")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("failed to encode token")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// Verifies a bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// Symmetric HS256 token codec.
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256Jwt {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    /// Sign a claims document into a compact token.
    pub fn issue(&self, claims: &JwtClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(TokenError::Encode)
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .map_err(TokenError::Invalid)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PrincipalId, Role};
    use chrono::Duration;

    fn test_claims(now: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            sub: PrincipalId::new(),
            role: Role::ADMIN,
            name: "Root".to_string(),
            email: Some("root@store.example".to_string()),
            issued_at: now,
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn round_trips_claims() {
        let jwt = Hs256Jwt::new("test-secret");
        let now = Utc::now();
        let claims = test_claims(now);

        let token = jwt.issue(&claims).unwrap();
        let decoded = jwt.validate(&token, now).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_wrong_secret() {
        let issuer = Hs256Jwt::new("secret-a");
        let verifier = Hs256Jwt::new("secret-b");
        let now = Utc::now();

        let token = issuer.issue(&test_claims(now)).unwrap();
        assert!(matches!(
            verifier.validate(&token, now),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let jwt = Hs256Jwt::new("test-secret");
        let now = Utc::now();

        let token = jwt.issue(&test_claims(now)).unwrap();
        let later = now + Duration::minutes(30);
        assert!(matches!(
            jwt.validate(&token, later),
            Err(TokenError::Claims(TokenValidationError::Expired))
        ));
    }
}
