//! HTTP middleware: session extraction and CORS.

mod auth;
mod cors;

pub use auth::CurrentAccount;
pub use cors::create_cors_layer;
