//! Account repository.
//!
//! CRUD operations for accounts plus the conditional updates that consume
//! pending one-time secrets. Consumption always checks the affected-row
//! count so a secret is accepted at most once under concurrent requests.

use sqlx::SqlitePool;

use super::account::{Account, CartItem, NewAccount};
use crate::{AuthError, Result};

const ACCOUNT_COLUMNS: &str = "id, name, email, password, role, is_verified, \
     verification_code, verification_expires_at, reset_token, reset_expires_at, created_at";

/// Normalize an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for account operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new AccountRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// The initial password hash is recorded as the first history entry in
    /// the same transaction. Returns the created account with its ID.
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        let email = normalize_email(&new_account.email);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO accounts (name, email, password, role, verification_code, verification_expires_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_account.name)
        .bind(&email)
        .bind(&new_account.password)
        .bind(new_account.role.as_str())
        .bind(&new_account.verification_code)
        .bind(&new_account.verification_expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                AuthError::Conflict("This email already exists. Try to use another one".to_string())
            } else {
                AuthError::Database(e.to_string())
            }
        })?;

        let id = result.last_insert_rowid();

        sqlx::query("INSERT INTO password_history (account_id, password) VALUES (?, ?)")
            .bind(id)
            .bind(&new_account.password)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| AuthError::NotFound("account".to_string()))
    }

    /// Get an account by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Find an account by email (case-insensitive, via normalization).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?"
        ))
        .bind(normalize_email(email))
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Check whether an email is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = ?)")
            .bind(normalize_email(email))
            .fetch_one(self.pool)
            .await?;
        Ok(exists)
    }

    /// Count all accounts.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Find an account whose stored verification digest matches and whose
    /// expiry is still in the future.
    ///
    /// A wrong digest and an expired one are indistinguishable by design.
    pub async fn find_by_verification_secret(&self, digest: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts
             WHERE verification_code = ? AND verification_expires_at > datetime('now')"
        ))
        .bind(digest)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// Consume a pending verification secret and mark the account verified.
    ///
    /// Conditional update: succeeds only while the same unexpired digest is
    /// still stored, clearing it in the same statement. Returns false when
    /// another request consumed the secret first or it expired meanwhile.
    pub async fn mark_verified(&self, id: i64, digest: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE accounts
             SET is_verified = 1, verification_code = NULL, verification_expires_at = NULL
             WHERE id = ? AND verification_code = ? AND verification_expires_at > datetime('now')",
        )
        .bind(id)
        .bind(digest)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Store a pending reset secret, overwriting any previous one.
    pub async fn store_reset_secret(&self, id: i64, digest: &str, expires_at: &str) -> Result<()> {
        sqlx::query("UPDATE accounts SET reset_token = ?, reset_expires_at = ? WHERE id = ?")
            .bind(digest)
            .bind(expires_at)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Find an account whose stored reset digest matches and is unexpired.
    pub async fn find_by_reset_secret(&self, digest: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts
             WHERE reset_token = ? AND reset_expires_at > datetime('now')"
        ))
        .bind(digest)
        .fetch_optional(self.pool)
        .await?;

        Ok(account)
    }

    /// List password history for an account, oldest first.
    pub async fn list_password_history(&self, account_id: i64) -> Result<Vec<String>> {
        let hashes: Vec<String> = sqlx::query_scalar(
            "SELECT password FROM password_history WHERE account_id = ? ORDER BY id ASC",
        )
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;

        Ok(hashes)
    }

    /// Apply a password reset in a single transaction.
    ///
    /// Conditionally replaces the password and clears the reset secret
    /// (consuming it at most once), optionally deletes the oldest history
    /// entry evicted by the reuse check, appends the new hash, and trims the
    /// history to capacity. Returns false without committing anything when
    /// the secret was already consumed or expired.
    pub async fn apply_password_reset(
        &self,
        id: i64,
        token_digest: &str,
        new_hash: &str,
        evict_oldest: bool,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE accounts
             SET password = ?, reset_token = NULL, reset_expires_at = NULL
             WHERE id = ? AND reset_token = ? AND reset_expires_at > datetime('now')",
        )
        .bind(new_hash)
        .bind(id)
        .bind(token_digest)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        if evict_oldest {
            sqlx::query(
                "DELETE FROM password_history
                 WHERE id = (SELECT MIN(id) FROM password_history WHERE account_id = ?)",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("INSERT INTO password_history (account_id, password) VALUES (?, ?)")
            .bind(id)
            .bind(new_hash)
            .execute(&mut *tx)
            .await?;

        // Trim from the front if the history exceeds capacity
        sqlx::query(
            "DELETE FROM password_history
             WHERE account_id = ?
               AND id NOT IN (
                   SELECT id FROM password_history
                   WHERE account_id = ? ORDER BY id DESC LIMIT 3
               )",
        )
        .bind(id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// List cart items for an account.
    pub async fn list_cart_items(&self, account_id: i64) -> Result<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(
            "SELECT id, account_id, product_id, quantity FROM cart_items WHERE account_id = ?",
        )
        .bind(account_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
