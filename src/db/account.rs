//! Account model.

use std::fmt;
use std::str::FromStr;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Regular customer.
    #[default]
    Customer,
    /// Administrator.
    Admin,
}

impl Role {
    /// Convert role to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// Account entity.
///
/// `verification_code` and `reset_token` hold SHA-256 digests of the
/// one-time secrets, paired with their absolute expiry instants. Both are
/// cleared in the same update that consumes them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address (unique, lower-cased).
    pub email: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Account role.
    pub role: String,
    /// Whether the email address has been verified.
    pub is_verified: bool,
    /// Pending verification secret digest (None if no verification pending).
    pub verification_code: Option<String>,
    /// Verification secret expiry.
    pub verification_expires_at: Option<String>,
    /// Pending reset secret digest (None if no reset pending).
    pub reset_token: Option<String>,
    /// Reset secret expiry.
    pub reset_expires_at: Option<String>,
    /// Account creation timestamp.
    pub created_at: String,
}

impl Account {
    /// Get the account role as enum.
    pub fn role(&self) -> Role {
        Role::from_str(&self.role).unwrap_or_default()
    }

    /// Check whether a verification secret is currently stored.
    pub fn has_pending_verification(&self) -> bool {
        self.verification_code.is_some()
    }

    /// Check whether a reset secret is currently stored.
    pub fn has_pending_reset(&self) -> bool {
        self.reset_token.is_some()
    }
}

/// Data for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Email address. Normalized to lower case on insert.
    pub email: String,
    /// Password hash (pre-hashed with Argon2).
    pub password: String,
    /// Account role (defaults to Customer).
    pub role: Role,
    /// Pending verification secret digest, set at signup.
    pub verification_code: Option<String>,
    /// Verification secret expiry.
    pub verification_expires_at: Option<String>,
}

impl NewAccount {
    /// Create a new account with the minimal required fields.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: Role::Customer,
            verification_code: None,
            verification_expires_at: None,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the pending verification secret (digest + expiry).
    pub fn with_verification_secret(
        mut self,
        digest: impl Into<String>,
        expires_at: impl Into<String>,
    ) -> Self {
        self.verification_code = Some(digest.into());
        self.verification_expires_at = Some(expires_at.into());
        self
    }
}

/// Cart line item. Carried as inert state on the account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItem {
    /// Line item ID.
    pub id: i64,
    /// Owning account ID.
    pub account_id: i64,
    /// Product reference.
    pub product_id: String,
    /// Quantity.
    pub quantity: i64,
}
