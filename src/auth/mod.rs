//! Authentication core.
//!
//! Secret codec, credential store, token mint and the account lifecycle
//! state machine that orchestrates them.

mod lifecycle;
mod password;
mod secret;
mod token;

pub use lifecycle::{
    AccountLifecycle, SignupForm, RESET_TOKEN_TTL_MINS, VERIFICATION_CODE_TTL_MINS,
};
pub use password::{
    hash_password, is_reused, validate_password, verify_password, PasswordError,
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, PASSWORD_HISTORY_CAPACITY,
};
pub use secret::{generate_reset_token, generate_verification_code, hash_secret};
pub use token::{SessionClaims, TokenMint};
