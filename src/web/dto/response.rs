//! Response DTOs.

use serde::Serialize;

use crate::db::{Account, CartItem};

/// Success response envelope. Optional parts are omitted from the JSON.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Sanitized account representation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AccountInfo>,
}

impl AuthResponse {
    /// Message-only success response.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            user: None,
        }
    }

    /// Success response carrying the account.
    pub fn with_user(message: impl Into<String>, user: AccountInfo) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            user: Some(user),
        }
    }

    /// Success response carrying only the account.
    pub fn user(user: AccountInfo) -> Self {
        Self {
            status: "success",
            message: None,
            user: Some(user),
        }
    }
}

/// Sanitized account representation. Never carries the password hash or any
/// pending secret.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Account ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Account role.
    pub role: String,
    /// Whether the email has been verified.
    pub is_verified: bool,
    /// Cart line items.
    pub cart_items: Vec<CartItemInfo>,
    /// Account creation timestamp.
    pub created_at: String,
}

impl AccountInfo {
    /// Build the sanitized representation from an account and its cart.
    pub fn from_account(account: &Account, cart: Vec<CartItem>) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role.clone(),
            is_verified: account.is_verified,
            cart_items: cart.into_iter().map(CartItemInfo::from).collect(),
            created_at: account.created_at.clone(),
        }
    }
}

/// Cart line item in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInfo {
    /// Product reference.
    pub product_id: String,
    /// Quantity.
    pub quantity: i64,
}

impl From<CartItem> for CartItemInfo {
    fn from(item: CartItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}
