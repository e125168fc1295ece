//! HTML templates for outgoing mail.
//!
//! Placeholders in braces are substituted by the mail service.

/// Verification email. Placeholder: `{verificationCode}`.
pub const VERIFICATION_EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Verify your email</h2>
  <p>Thanks for signing up to Shop Sphere. Enter this code to verify your email address:</p>
  <p style="font-size: 32px; font-weight: bold; letter-spacing: 6px;">{verificationCode}</p>
  <p>The code expires in 15 minutes.</p>
  <p>If you didn't create an account, you can safely ignore this email.</p>
</body>
</html>"#;

/// Welcome email, sent after successful verification. Placeholder: `{name}`.
pub const WELCOME_EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Welcome to Shop Sphere, {name}!</h2>
  <p>Your email is verified and your account is ready to use.</p>
  <p>Happy shopping!</p>
</body>
</html>"#;

/// Password-reset request email. Placeholder: `{resetURL}`.
pub const PASSWORD_RESET_REQUEST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Reset your password</h2>
  <p>We received a request to reset your password. Click the link below to choose a new one:</p>
  <p><a href="{resetURL}">Reset password</a></p>
  <p>The link expires in 10 minutes.</p>
  <p>If you didn't request a reset, you can safely ignore this email.</p>
</body>
</html>"#;

/// Password-reset success confirmation email.
pub const PASSWORD_RESET_SUCCESS_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Your password was reset</h2>
  <p>Your Shop Sphere password has been changed successfully.</p>
  <p>If you didn't do this, please contact support immediately.</p>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_carry_placeholders() {
        assert!(VERIFICATION_EMAIL_TEMPLATE.contains("{verificationCode}"));
        assert!(WELCOME_EMAIL_TEMPLATE.contains("{name}"));
        assert!(PASSWORD_RESET_REQUEST_TEMPLATE.contains("{resetURL}"));
    }

    #[test]
    fn test_success_template_has_no_placeholders() {
        assert!(!PASSWORD_RESET_SUCCESS_TEMPLATE.contains('{'));
    }
}
