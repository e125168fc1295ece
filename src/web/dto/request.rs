//! Request DTOs.
//!
//! Every field defaults to empty when absent, so a missing field reaches the
//! lifecycle as empty input and comes back as a 400 with the domain wording
//! rather than a deserialization rejection.

use serde::Deserialize;

/// Signup request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
    /// Password confirmation.
    #[serde(default)]
    pub password_confirm: String,
}

/// Email verification request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    /// Six-digit verification code.
    #[serde(default)]
    pub verification_code: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

/// Forgot-password request.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Email address.
    #[serde(default)]
    pub email: String,
}

/// Reset-password request. The reset token travels in the URL path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// New plaintext password.
    #[serde(default)]
    pub new_password: String,
    /// New password confirmation.
    #[serde(default)]
    pub new_password_confirm: String,
}
