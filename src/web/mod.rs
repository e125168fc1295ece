//! HTTP boundary.
//!
//! A thin layer over the account lifecycle: routing, DTOs, the session
//! cookie and the uniform response envelope. No authentication rule is
//! implemented here.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
