//! Session token mint.
//!
//! Issues signed, tamper-evident bearer tokens binding an account identity
//! to an absolute expiry, and validates them. Verification failures are
//! deliberately indistinguishable: bad signature, malformed token and
//! elapsed expiry all surface as the same generic outcome.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{AuthError, Result};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (account ID).
    pub sub: i64,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// Token ID (unique identifier).
    pub jti: String,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenMint {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_secs: u64,
}

impl TokenMint {
    /// Create a new token mint from a signing secret and a token lifetime.
    pub fn new(secret: &str, expiry_secs: u64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_secs,
        }
    }

    /// Token lifetime in seconds. The session cookie max-age matches this.
    pub fn expiry_secs(&self) -> u64 {
        self.expiry_secs
    }

    /// Issue a session token for an account.
    pub fn issue(&self, account_id: i64) -> Result<String> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: account_id,
            iat: now,
            exp: now + self.expiry_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {}", e);
            AuthError::Hash("failed to sign session token".to_string())
        })
    }

    /// Verify a session token and return the account ID it was issued for.
    ///
    /// Any failure maps to the same generic unauthorized outcome.
    pub fn verify(&self, token: &str) -> Result<i64> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                tracing::debug!("Session token validation failed: {}", e);
                AuthError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}

impl std::fmt::Debug for TokenMint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenMint")
            .field("expiry_secs", &self.expiry_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn test_issue_and_verify() {
        let mint = TokenMint::new("test-secret", 3600);
        let token = mint.issue(42).unwrap();
        assert_eq!(mint.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_verify_wrong_secret() {
        let mint = TokenMint::new("secret-one", 3600);
        let token = mint.issue(1).unwrap();

        let other = TokenMint::new("secret-two", 3600);
        let result = other.verify(&token);
        assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn test_verify_malformed_token() {
        let mint = TokenMint::new("test-secret", 3600);
        assert!(mint.verify("not-a-token").is_err());
        assert!(mint.verify("").is_err());
    }

    #[test]
    fn test_verify_expired_token() {
        let mint = TokenMint::new("test-secret", 3600);

        let now = chrono::Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: 1,
            iat: now - 7200,
            exp: now - 3600, // Expired an hour ago
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret".as_bytes()),
        )
        .unwrap();

        let result = mint.verify(&token);
        assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    }

    #[test]
    fn test_failure_message_is_uniform() {
        let mint = TokenMint::new("secret-one", 3600);
        let forged = TokenMint::new("secret-two", 3600).issue(1).unwrap();

        let bad_signature = mint.verify(&forged).unwrap_err().to_string();
        let malformed = mint.verify("garbage").unwrap_err().to_string();
        assert_eq!(bad_signature, malformed);
    }

    #[test]
    fn test_tokens_are_unique_per_issue() {
        let mint = TokenMint::new("test-secret", 3600);
        let a = mint.issue(1).unwrap();
        let b = mint.issue(1).unwrap();
        // jti differs even for the same subject and instant
        assert_ne!(a, b);
    }
}
