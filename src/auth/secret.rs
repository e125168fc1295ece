//! One-way hashing of short-lived codes and tokens.
//!
//! Verification codes and reset tokens are stored only as SHA-256 digests;
//! lookup at verification time compares digests, never plaintext. The slow,
//! salted Argon2 path in [`super::password`] is reserved for the account
//! password itself.

use rand::distr::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of generated reset tokens.
pub const RESET_TOKEN_LENGTH: usize = 40;

/// Hash a plaintext code or token for storage.
///
/// Deterministic, one-way, returns a lowercase hex digest. Equal inputs
/// produce equal digests, so stored secrets can be matched by digest
/// equality without ever persisting the plaintext.
///
/// # Examples
///
/// ```
/// use shopsphere_auth::hash_secret;
///
/// assert_eq!(hash_secret("123456"), hash_secret("123456"));
/// assert_ne!(hash_secret("123456"), "123456");
/// ```
pub fn hash_secret(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Generate a random six-digit verification code.
///
/// Human-enterable: delivered by email and typed back by the user.
pub fn generate_verification_code() -> String {
    let code: u32 = rand::rng().random_range(100_000..=999_999);
    code.to_string()
}

/// Generate a random opaque reset-password token.
///
/// Delivered inside a reset URL; never stored in plaintext.
pub fn generate_reset_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_secret_deterministic() {
        assert_eq!(hash_secret("654321"), hash_secret("654321"));
    }

    #[test]
    fn test_hash_secret_differs_from_input() {
        for input in ["123456", "abcdef", "a-reset-token"] {
            assert_ne!(hash_secret(input), input);
        }
    }

    #[test]
    fn test_hash_secret_is_hex_sha256() {
        let digest = hash_secret("123456");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        // Known SHA-256 of "123456"
        assert_eq!(
            digest,
            "8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92"
        );
    }

    #[test]
    fn test_hash_secret_distinct_inputs() {
        assert_ne!(hash_secret("123456"), hash_secret("123457"));
    }

    #[test]
    fn test_verification_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next().unwrap(), '0');
        }
    }

    #[test]
    fn test_reset_token_shape() {
        let token = generate_reset_token();
        assert_eq!(token.len(), RESET_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_reset_tokens_are_random() {
        assert_ne!(generate_reset_token(), generate_reset_token());
    }
}
