//! Database schema and migrations.
//!
//! Migrations are applied sequentially when the database is opened.

/// Database migrations.
///
/// Each migration is a SQL script executed in order. The schema_version
/// table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Accounts table
    r#"
-- Accounts table for authentication
CREATE TABLE accounts (
    id                       INTEGER PRIMARY KEY AUTOINCREMENT,
    name                     TEXT NOT NULL,
    email                    TEXT NOT NULL UNIQUE,            -- stored lower-cased
    password                 TEXT NOT NULL,                   -- Argon2 hash
    role                     TEXT NOT NULL DEFAULT 'customer',-- 'customer' or 'admin'
    is_verified              INTEGER NOT NULL DEFAULT 0,
    verification_code        TEXT,                            -- SHA-256 digest, never plaintext
    verification_expires_at  TEXT,
    reset_token              TEXT,                            -- SHA-256 digest, never plaintext
    reset_expires_at         TEXT,
    created_at               TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_accounts_email ON accounts(email);
CREATE INDEX idx_accounts_verification_code ON accounts(verification_code);
CREATE INDEX idx_accounts_reset_token ON accounts(reset_token);
"#,
    // v2: Password history for reuse prevention
    r#"
-- Prior password hashes, oldest first by id. Capacity is enforced in code.
CREATE TABLE password_history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id  INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    password    TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_password_history_account_id ON password_history(account_id);
"#,
    // v3: Cart line items (carried state, not part of the auth flows)
    r#"
CREATE TABLE cart_items (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id  INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    product_id  TEXT NOT NULL,
    quantity    INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX idx_cart_items_account_id ON cart_items(account_id);
"#,
];
