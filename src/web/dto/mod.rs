//! Request and response DTOs.

mod request;
mod response;

pub use request::{
    ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest, VerifyEmailRequest,
};
pub use response::{AccountInfo, AuthResponse, CartItemInfo};
