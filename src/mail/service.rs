//! Outbound mail delivery.
//!
//! The notification sender is an injected collaborator: the lifecycle talks
//! to the [`Mailer`] trait, production wires an HTTP transactional-mail
//! client, tests wire an in-memory recorder. A delivery failure surfaces as
//! an internal error and aborts the enclosing state transition.

use std::sync::{Arc, Mutex};

use axum::async_trait;
use serde_json::json;

use crate::config::MailConfig;
use crate::{AuthError, Result};

use super::templates::{
    PASSWORD_RESET_REQUEST_TEMPLATE, PASSWORD_RESET_SUCCESS_TEMPLATE,
    VERIFICATION_EMAIL_TEMPLATE, WELCOME_EMAIL_TEMPLATE,
};

/// Kind of outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    /// Verification code after signup.
    Verification,
    /// Welcome message after successful verification.
    Welcome,
    /// Password-reset request with embedded URL.
    PasswordResetRequest,
    /// Password-reset success confirmation.
    PasswordResetSuccess,
}

impl MailKind {
    /// Category string reported to the mail provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            MailKind::Verification => "Verification Email",
            MailKind::Welcome => "Welcome Email",
            MailKind::PasswordResetRequest => "Reset Password",
            MailKind::PasswordResetSuccess => "Reset Password",
        }
    }
}

/// A fully rendered outgoing message.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    /// Message kind.
    pub kind: MailKind,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Rendered HTML body.
    pub html: String,
}

/// Delivery backend for outgoing mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message, or fail with an internal error.
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Mailer that posts to a Mailtrap-style transactional mail API.
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
    sender_email: String,
    sender_name: String,
}

impl HttpMailer {
    /// Create a new HTTP mailer from configuration.
    pub fn new(config: &MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let body = json!({
            "from": { "email": self.sender_email, "name": self.sender_name },
            "to": [ { "email": mail.to } ],
            "subject": mail.subject,
            "html": mail.html,
            "category": mail.kind.as_str(),
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Mail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::Mail(format!(
                "mail API returned status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Mailer that records messages in memory.
///
/// Used by tests and by local development when no mail API token is
/// configured.
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
}

impl MemoryMailer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded messages, in send order.
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }

    /// The most recently recorded message, if any.
    pub fn last(&self) -> Option<OutgoingMail> {
        self.sent.lock().expect("mailer lock poisoned").last().cloned()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        tracing::info!(kind = ?mail.kind, to = %mail.to, "Recording outgoing mail");
        self.sent.lock().expect("mailer lock poisoned").push(mail.clone());
        Ok(())
    }
}

/// High-level mail operations: renders templates and delegates delivery.
#[derive(Clone)]
pub struct MailService {
    mailer: Arc<dyn Mailer>,
}

impl MailService {
    /// Create a new mail service over a delivery backend.
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Send the verification-code email. The plaintext code appears only
    /// here; it is never stored.
    pub async fn send_verification_email(&self, to: &str, code: &str) -> Result<()> {
        let mail = OutgoingMail {
            kind: MailKind::Verification,
            to: to.to_string(),
            subject: "Verify your email".to_string(),
            html: VERIFICATION_EMAIL_TEMPLATE.replace("{verificationCode}", code),
        };
        self.mailer.send(&mail).await
    }

    /// Send the welcome email after verification.
    pub async fn send_welcome_email(&self, to: &str, name: &str) -> Result<()> {
        let mail = OutgoingMail {
            kind: MailKind::Welcome,
            to: to.to_string(),
            subject: "Welcome to Shop Sphere".to_string(),
            html: WELCOME_EMAIL_TEMPLATE.replace("{name}", name),
        };
        self.mailer.send(&mail).await
    }

    /// Send the reset-password request email with the embedded reset URL.
    pub async fn send_reset_password_email(&self, to: &str, reset_url: &str) -> Result<()> {
        let mail = OutgoingMail {
            kind: MailKind::PasswordResetRequest,
            to: to.to_string(),
            subject: "Reset your password".to_string(),
            html: PASSWORD_RESET_REQUEST_TEMPLATE.replace("{resetURL}", reset_url),
        };
        self.mailer.send(&mail).await
    }

    /// Send the reset-success confirmation email.
    pub async fn send_reset_success_email(&self, to: &str) -> Result<()> {
        let mail = OutgoingMail {
            kind: MailKind::PasswordResetSuccess,
            to: to.to_string(),
            subject: "Your password is reset successfully".to_string(),
            html: PASSWORD_RESET_SUCCESS_TEMPLATE.to_string(),
        };
        self.mailer.send(&mail).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_recorder() -> (MailService, MemoryMailer) {
        let mailer = MemoryMailer::new();
        (MailService::new(Arc::new(mailer.clone())), mailer)
    }

    #[tokio::test]
    async fn test_send_verification_email() {
        let (service, recorder) = service_with_recorder();

        service
            .send_verification_email("ann@x.com", "123456")
            .await
            .unwrap();

        let sent = recorder.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, MailKind::Verification);
        assert_eq!(sent[0].to, "ann@x.com");
        assert!(sent[0].html.contains("123456"));
        assert!(!sent[0].html.contains("{verificationCode}"));
    }

    #[tokio::test]
    async fn test_send_welcome_email() {
        let (service, recorder) = service_with_recorder();

        service.send_welcome_email("ann@x.com", "Ann").await.unwrap();

        let mail = recorder.last().unwrap();
        assert_eq!(mail.kind, MailKind::Welcome);
        assert!(mail.html.contains("Ann"));
    }

    #[tokio::test]
    async fn test_send_reset_password_email() {
        let (service, recorder) = service_with_recorder();

        service
            .send_reset_password_email("ann@x.com", "http://client/reset-password/tok123")
            .await
            .unwrap();

        let mail = recorder.last().unwrap();
        assert_eq!(mail.kind, MailKind::PasswordResetRequest);
        assert!(mail.html.contains("http://client/reset-password/tok123"));
    }

    #[tokio::test]
    async fn test_send_reset_success_email() {
        let (service, recorder) = service_with_recorder();

        service.send_reset_success_email("ann@x.com").await.unwrap();

        let mail = recorder.last().unwrap();
        assert_eq!(mail.kind, MailKind::PasswordResetSuccess);
        assert_eq!(mail.subject, "Your password is reset successfully");
    }

    #[tokio::test]
    async fn test_memory_mailer_records_in_order() {
        let (service, recorder) = service_with_recorder();

        service
            .send_verification_email("a@x.com", "111111")
            .await
            .unwrap();
        service.send_welcome_email("a@x.com", "A").await.unwrap();

        let sent = recorder.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].kind, MailKind::Verification);
        assert_eq!(sent[1].kind, MailKind::Welcome);
    }
}
