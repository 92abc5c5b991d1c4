//! HS256 token encode/verify.
//!
//! Signature handling is kept behind the [`JwtValidator`] trait so the API
//! middleware stays algorithm-agnostic. Claim times are checked by
//! [`crate::claims::validate_claims`], not by the JWT library, so the policy
//! is a single deterministic function.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token signature or format invalid: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verify a bearer token and return its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError>;
}

/// HS256 (shared secret) token codec.
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256Jwt {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Sign claims into a compact token.
    pub fn encode(&self, claims: &JwtClaims) -> Result<String, JwtError> {
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?;
        Ok(token)
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time window lives in our claims (`issued_at`/`expires_at`) and is
        // enforced by `validate_claims`; the library's numeric `exp` claim is
        // not present.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &Self::validation())?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::{PrincipalId, Role};

    use super::*;

    fn sample_claims(now: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            sub: PrincipalId::new(),
            username: "matron".to_string(),
            roles: vec![Role::admin()],
            issued_at: now,
            expires_at: now + Duration::minutes(30),
        }
    }

    #[test]
    fn round_trip() {
        let now = Utc::now();
        let jwt = Hs256Jwt::new(b"test-secret");
        let claims = sample_claims(now);

        let token = jwt.encode(&claims).unwrap();
        let decoded = jwt.validate(&token, now + Duration::minutes(1)).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn wrong_secret_rejected() {
        let now = Utc::now();
        let token = Hs256Jwt::new(b"secret-a").encode(&sample_claims(now)).unwrap();

        let err = Hs256Jwt::new(b"secret-b").validate(&token, now).unwrap_err();
        assert!(matches!(err, JwtError::Invalid(_)));
    }

    #[test]
    fn expired_claims_rejected() {
        let now = Utc::now();
        let jwt = Hs256Jwt::new(b"test-secret");
        let token = jwt.encode(&sample_claims(now)).unwrap();

        let err = jwt.validate(&token, now + Duration::hours(1)).unwrap_err();
        assert!(matches!(
            err,
            JwtError::Claims(TokenValidationError::Expired)
        ));
    }
}
