//! Shop Sphere authentication backend.
//!
//! User-account registration with email verification, credential-based login
//! issuing a session cookie, and a forgot/reset-password flow with
//! password-reuse prevention, served over HTTP.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod web;

pub use auth::{
    generate_reset_token, generate_verification_code, hash_password, hash_secret, is_reused,
    validate_password, verify_password, AccountLifecycle, PasswordError, SessionClaims, TokenMint,
    PASSWORD_HISTORY_CAPACITY,
};
pub use config::Config;
pub use db::{Account, AccountRepository, CartItem, Database, NewAccount, Role};
pub use error::{AuthError, Result};
pub use mail::{MailService, Mailer, MemoryMailer};
