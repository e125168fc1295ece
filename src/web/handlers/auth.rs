//! Authentication handlers.
//!
//! Thin wiring from HTTP to the account lifecycle: deserialize the request,
//! run the transition, translate the outcome into the response envelope and
//! manage the session cookie. No authentication rule lives here.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::{AccountLifecycle, SignupForm, TokenMint};
use crate::config::AuthConfig;
use crate::db::{AccountRepository, Database};
use crate::mail::Mailer;
use crate::web::dto::{
    AccountInfo, AuthResponse, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest,
    SignupRequest, VerifyEmailRequest,
};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentAccount;
use crate::Account;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The account lifecycle state machine.
    pub lifecycle: AccountLifecycle,
    /// Connection pool, for read-only lookups outside the lifecycle.
    pub pool: sqlx::SqlitePool,
    /// Session cookie max-age in seconds.
    pub session_expiry_secs: u64,
    /// Whether to mark the session cookie as Secure.
    pub secure_cookies: bool,
}

impl AppState {
    /// Create the application state.
    pub fn new(db: &Database, mailer: Arc<dyn Mailer>, auth: &AuthConfig) -> Self {
        let tokens = TokenMint::new(&auth.jwt_secret, auth.session_expiry_secs);
        Self {
            lifecycle: AccountLifecycle::new(
                db.pool().clone(),
                mailer,
                tokens,
                auth.client_url.clone(),
            ),
            pool: db.pool().clone(),
            session_expiry_secs: auth.session_expiry_secs,
            secure_cookies: auth.secure_cookies,
        }
    }

    /// Build the sanitized account representation, cart included.
    pub async fn account_info(&self, account: &Account) -> Result<AccountInfo, ApiError> {
        let cart = AccountRepository::new(&self.pool)
            .list_cart_items(account.id)
            .await?;
        Ok(AccountInfo::from_account(account, cart))
    }

    /// Session cookie carrying a freshly issued token.
    fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure_cookies)
            .max_age(time::Duration::seconds(self.session_expiry_secs as i64))
            .build()
    }

    /// Expired session cookie, instructing the browser to drop it.
    fn clear_session_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure_cookies)
            .max_age(time::Duration::ZERO)
            .build()
    }
}

/// POST /api/v1/auth/signup - Create an unverified account.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let form = SignupForm {
        name: req.name,
        email: req.email,
        password: req.password,
        password_confirm: req.password_confirm,
    };

    let account = state.lifecycle.signup(&form).await?;
    let info = state.account_info(&account).await?;

    Ok(Json(AuthResponse::with_user(
        "Account created. Please check your email for the verification code",
        info,
    )))
}

/// POST /api/v1/auth/verify-email - Verify an email address and open a session.
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let (account, token) = state.lifecycle.verify_email(&req.verification_code).await?;
    let info = state.account_info(&account).await?;

    Ok((
        jar.add(state.session_cookie(token)),
        Json(AuthResponse::with_user("Email verified successfully", info)),
    ))
}

/// POST /api/v1/auth/login - Authenticate and open a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let (account, token) = state.lifecycle.login(&req.email, &req.password).await?;
    let info = state.account_info(&account).await?;

    Ok((
        jar.add(state.session_cookie(token)),
        Json(AuthResponse::with_user("Logged in successfully", info)),
    ))
}

/// POST /api/v1/auth/logout - Clear the session cookie.
///
/// Purely a transport concern; the token itself stays valid until expiry.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<AuthResponse>) {
    (
        jar.add(state.clear_session_cookie()),
        Json(AuthResponse::message("Logged out successfully")),
    )
}

/// POST /api/v1/auth/forgot-password - Start the password-reset flow.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    state.lifecycle.forgot_password(&req.email).await?;
    Ok(Json(AuthResponse::message(
        "Password reset link sent to your email",
    )))
}

/// POST /api/v1/auth/reset-password/:token - Complete a password reset.
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    state
        .lifecycle
        .reset_password(&token, &req.new_password, &req.new_password_confirm)
        .await?;
    Ok(Json(AuthResponse::message("Password reset successful")))
}

/// GET /api/v1/auth/me - Current account profile.
pub async fn me(
    State(state): State<Arc<AppState>>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<AuthResponse>, ApiError> {
    let info = state.account_info(&account).await?;
    Ok(Json(AuthResponse::user(info)))
}
