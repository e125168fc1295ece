//! Mail module.
//!
//! Rendering and delivery of the four transactional messages: verification
//! code, welcome, password-reset request and password-reset confirmation.

mod service;
mod templates;

pub use service::{HttpMailer, MailKind, MailService, Mailer, MemoryMailer, OutgoingMail};
pub use templates::{
    PASSWORD_RESET_REQUEST_TEMPLATE, PASSWORD_RESET_SUCCESS_TEMPLATE,
    VERIFICATION_EMAIL_TEMPLATE, WELCOME_EMAIL_TEMPLATE,
};
