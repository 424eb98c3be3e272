//! Bearer credential minting and verification.
//!
//! Tokens are HS256 JWTs carrying `{sub, iat, exp}`. The signing secret is
//! deployment configuration shared out of band: every service builds its own
//! [`TokenKeys`] at startup and passes it into handlers and middleware —
//! there is no hidden global.
//!
//! Verification here is stateless by design. It checks signature and expiry
//! only and never consults the session store, so losing the session store
//! degrades revocation, not verification. Revocation-sensitive operations
//! (refresh, logout) layer the session-record comparison on top inside the
//! identity service.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

mod middleware;

pub use middleware::{AuthenticatedUser, RequireAuth};

/// Token lifetime: 7 days, matching the session record TTL.
pub const TOKEN_LIFETIME: Duration = Duration::days(7);

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn subject_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Invalid)
    }
}

/// Signing and validation keys built from the shared deployment secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Mint a token for a subject with the standard lifetime.
    pub fn mint(&self, subject: Uuid) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + TOKEN_LIFETIME).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|err| {
            tracing::error!(error = %err, "failed to sign token");
            TokenError::Invalid
        })
    }

    /// Stateless verification: signature and expiry only.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::from_secret("test-signing-secret")
    }

    #[test]
    fn minted_token_verifies_and_round_trips_subject() {
        let keys = keys();
        let subject = Uuid::new_v4();
        let token = keys.mint(subject).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.subject_id().unwrap(), subject);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenKeys::from_secret("other-secret")
            .mint(Uuid::new_v4())
            .unwrap();
        assert!(matches!(keys().verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            keys().verify("not-a-jwt"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // Hand-build claims already past expiry; Validation applies 60s leeway
        // by default, so push exp well past it.
        let keys = keys();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: (now - Duration::days(8)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(matches!(keys.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn stateless_verify_keeps_accepting_after_revocation() {
        // Deleting the session record elsewhere does not affect this path;
        // the token stays verifiable until its embedded expiry lapses.
        let keys = keys();
        let token = keys.mint(Uuid::new_v4()).unwrap();
        assert!(keys.verify(&token).is_ok());
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
