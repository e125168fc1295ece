//! HTTP handlers.

mod auth;

pub use auth::{
    forgot_password, login, logout, me, reset_password, signup, verify_email, AppState,
    SESSION_COOKIE,
};
