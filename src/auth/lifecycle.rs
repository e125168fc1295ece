//! Account lifecycle state machine.
//!
//! Orchestrates signup, email verification, login, forgot-password and
//! reset-password. Each transition is an explicit, ordered sequence: validate
//! input, delegate cryptographic work, send the outbound email, then persist.
//! Emails are sent before the record mutation so a delivery failure aborts
//! the transition without committing partial state.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use validator::ValidateEmail;

use crate::db::{AccountRepository, NewAccount};
use crate::mail::{MailService, Mailer};
use crate::{Account, AuthError, Result};

use super::password::{self, PasswordError, PASSWORD_HISTORY_CAPACITY};
use super::secret;
use super::token::TokenMint;

/// Verification codes expire this many minutes after signup.
pub const VERIFICATION_CODE_TTL_MINS: i64 = 15;

/// Reset tokens expire this many minutes after a forgot-password request.
pub const RESET_TOKEN_TTL_MINS: i64 = 10;

/// Signup input.
#[derive(Debug, Clone)]
pub struct SignupForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Password confirmation. Checked before hashing, never persisted.
    pub password_confirm: String,
}

/// The account lifecycle state machine.
///
/// Holds its collaborators by injection: the record store pool, the
/// notification sender and the token mint.
#[derive(Clone)]
pub struct AccountLifecycle {
    pool: SqlitePool,
    mail: MailService,
    tokens: TokenMint,
    client_url: String,
}

impl AccountLifecycle {
    /// Create a new lifecycle over its collaborators.
    pub fn new(
        pool: SqlitePool,
        mailer: Arc<dyn Mailer>,
        tokens: TokenMint,
        client_url: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            mail: MailService::new(mailer),
            tokens,
            client_url: client_url.into(),
        }
    }

    /// The token mint, for boundary-layer session verification.
    pub fn tokens(&self) -> &TokenMint {
        &self.tokens
    }

    fn repo(&self) -> AccountRepository<'_> {
        AccountRepository::new(&self.pool)
    }

    /// Absolute expiry instant, `minutes` from now, in store format.
    fn expiry_from_now(minutes: i64) -> String {
        (Utc::now() + Duration::minutes(minutes))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }

    fn map_password_error(e: PasswordError) -> AuthError {
        match e {
            PasswordError::TooShort | PasswordError::TooLong => {
                AuthError::Validation(e.to_string())
            }
            other => AuthError::Hash(other.to_string()),
        }
    }

    /// Sign up a new account.
    ///
    /// Creates the account unverified, with the password hash as the single
    /// history entry and a pending verification secret expiring in 15
    /// minutes. The plaintext code goes out by email and is never stored.
    pub async fn signup(&self, form: &SignupForm) -> Result<Account> {
        let name = form.name.trim();
        let email = form.email.trim();

        if name.is_empty()
            || email.is_empty()
            || form.password.is_empty()
            || form.password_confirm.is_empty()
        {
            return Err(AuthError::Validation(
                "Please enter your name, email, password and confirm password".to_string(),
            ));
        }
        if !email.validate_email() {
            return Err(AuthError::Validation(
                "Please provide a valid email".to_string(),
            ));
        }
        if form.password != form.password_confirm {
            return Err(AuthError::Validation(
                "Passwords are not the same".to_string(),
            ));
        }

        let repo = self.repo();
        if repo.email_exists(email).await? {
            return Err(AuthError::Conflict(
                "This email already exists. Try to use another one".to_string(),
            ));
        }

        let password_hash =
            password::hash_password(&form.password).map_err(Self::map_password_error)?;

        let code = secret::generate_verification_code();
        let new_account = NewAccount::new(name, email, password_hash).with_verification_secret(
            secret::hash_secret(&code),
            Self::expiry_from_now(VERIFICATION_CODE_TTL_MINS),
        );

        // Send before persist: a delivery failure must not leave an account
        // behind with no way to receive its code.
        self.mail.send_verification_email(email, &code).await?;

        let account = repo.create(&new_account).await?;
        tracing::info!(account_id = account.id, "Account created, verification pending");
        Ok(account)
    }

    /// Verify an email address with a plaintext code.
    ///
    /// A wrong code and an expired one produce the same outcome. On success
    /// the secret is consumed, the account becomes verified and a session
    /// token is issued.
    pub async fn verify_email(&self, code: &str) -> Result<(Account, String)> {
        if code.trim().is_empty() {
            return Err(AuthError::Validation(
                "Please enter verification code".to_string(),
            ));
        }

        let repo = self.repo();
        let digest = secret::hash_secret(code.trim());

        let account = repo
            .find_by_verification_secret(&digest)
            .await?
            .ok_or_else(|| {
                AuthError::Validation("Verification code is invalid or has expired".to_string())
            })?;

        self.mail
            .send_welcome_email(&account.email, &account.name)
            .await?;

        // Conditional consume: a concurrent request may have won the race.
        if !repo.mark_verified(account.id, &digest).await? {
            return Err(AuthError::Validation(
                "Verification code is invalid or has expired".to_string(),
            ));
        }

        let token = self.tokens.issue(account.id)?;
        let account = repo
            .get_by_id(account.id)
            .await?
            .ok_or_else(|| AuthError::NotFound("account".to_string()))?;

        tracing::info!(account_id = account.id, "Email verified");
        Ok((account, token))
    }

    /// Log in with email and password.
    ///
    /// A nonexistent email and a wrong password yield the identical
    /// unauthorized message, so callers cannot enumerate accounts. Being
    /// unverified does not block login.
    pub async fn login(&self, email: &str, password_plain: &str) -> Result<(Account, String)> {
        if email.trim().is_empty() || password_plain.is_empty() {
            return Err(AuthError::Validation(
                "Please provide email and password".to_string(),
            ));
        }

        let invalid = || AuthError::Unauthorized("Invalid email or password".to_string());

        let account = self
            .repo()
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        password::verify_password(password_plain, &account.password).map_err(|_| invalid())?;

        let token = self.tokens.issue(account.id)?;
        tracing::debug!(account_id = account.id, "Login succeeded");
        Ok((account, token))
    }

    /// Start the forgot-password flow.
    ///
    /// Unlike login, this flow reveals whether the email exists. Any
    /// previous pending reset secret is overwritten.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        if email.trim().is_empty() {
            return Err(AuthError::Validation(
                "Please provide your email.".to_string(),
            ));
        }

        let repo = self.repo();
        let account = repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound("This email does not exist.".to_string()))?;

        let token = secret::generate_reset_token();
        let reset_url = format!(
            "{}/reset-password/{}",
            self.client_url.trim_end_matches('/'),
            token
        );

        self.mail
            .send_reset_password_email(&account.email, &reset_url)
            .await?;

        repo.store_reset_secret(
            account.id,
            &secret::hash_secret(&token),
            &Self::expiry_from_now(RESET_TOKEN_TTL_MINS),
        )
        .await?;

        tracing::info!(account_id = account.id, "Reset token stored");
        Ok(())
    }

    /// Complete a password reset with a plaintext token.
    ///
    /// Rejects passwords found in the bounded history. When the history is
    /// already at capacity, its oldest entry is evicted before the
    /// comparison (legacy order); the eviction is persisted only if the
    /// reset goes through.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        new_password_confirm: &str,
    ) -> Result<Account> {
        if new_password.is_empty() || new_password_confirm.is_empty() {
            return Err(AuthError::Validation(
                "Please provide password and confirm it.".to_string(),
            ));
        }

        let repo = self.repo();
        let digest = secret::hash_secret(token);

        let invalid =
            || AuthError::Validation("Token is invalid or has expired.".to_string());

        let account = repo
            .find_by_reset_secret(&digest)
            .await?
            .ok_or_else(invalid)?;

        let mut history = repo.list_password_history(account.id).await?;
        let evict_oldest = history.len() == PASSWORD_HISTORY_CAPACITY;
        if evict_oldest {
            history.remove(0);
        }

        if password::is_reused(&history, new_password) {
            return Err(AuthError::Validation(
                "You used this password before. Please use another one.".to_string(),
            ));
        }

        if new_password != new_password_confirm {
            return Err(AuthError::Validation(
                "Passwords are not the same".to_string(),
            ));
        }

        let new_hash =
            password::hash_password(new_password).map_err(Self::map_password_error)?;

        self.mail.send_reset_success_email(&account.email).await?;

        if !repo
            .apply_password_reset(account.id, &digest, &new_hash, evict_oldest)
            .await?
        {
            return Err(invalid());
        }

        let account = repo
            .get_by_id(account.id)
            .await?
            .ok_or_else(|| AuthError::NotFound("account".to_string()))?;

        tracing::info!(account_id = account.id, "Password reset completed");
        Ok(account)
    }
}

impl std::fmt::Debug for AccountLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountLifecycle")
            .field("client_url", &self.client_url)
            .finish()
    }
}
