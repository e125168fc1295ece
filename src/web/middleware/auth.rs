//! Session-cookie authentication extractor.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::db::{Account, AccountRepository};
use crate::web::error::ApiError;
use crate::web::handlers::{AppState, SESSION_COOKIE};

/// Extractor for the authenticated account.
///
/// Reads the session cookie, verifies the token through the token mint and
/// loads the account. Handlers taking this extractor require a valid
/// session; all failures collapse into the generic 401.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| ApiError::unauthorized("You are not logged in"))?;

        let account_id = state.lifecycle.tokens().verify(&token).map_err(|e| {
            tracing::debug!("Session token rejected: {}", e);
            ApiError::unauthorized("Invalid or expired token")
        })?;

        let account = AccountRepository::new(&state.pool)
            .get_by_id(account_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(CurrentAccount(account))
    }
}
