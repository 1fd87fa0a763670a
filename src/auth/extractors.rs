//! Authorization gate: the `AuthedUser` extractor for protected routes

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{debug, error};

use super::models::{Provider, PublicUser};
use super::session::session_token;
use super::strategies::{AuthRoute, Credentials};
use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated user extractor
///
/// Runs the bearer strategy against the `token` cookie. Any failure rejects
/// the request with 401 before the handler runs. Admin status comes from the
/// configured admin email list. Carries the full public profile of the user
/// row resolved by the strategy, so handlers need no second lookup.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub provider: Provider,
    pub created_at: String,
    pub updated_at: String,
    pub is_admin: bool,
}

impl From<AuthedUser> for PublicUser {
    fn from(authed: AuthedUser) -> Self {
        PublicUser {
            id: authed.id,
            email: authed.email,
            name: authed.name,
            provider: authed.provider,
            created_at: authed.created_at,
            updated_at: authed.updated_at,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state): Extension<Arc<AppState>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let jar = CookieJar::from_headers(&parts.headers);
        let credentials = Credentials::Bearer {
            token: session_token(&jar),
        };

        match app_state
            .authenticator
            .authenticate_for(AuthRoute::Protected, credentials)
            .await
        {
            Ok(user) => {
                let is_admin = app_state.config.is_admin(&user.email);
                debug!(
                    user_id = %user.id,
                    email = %safe_email_log(&user.email),
                    is_admin = is_admin,
                    "User authentication successful via extractor"
                );
                Ok(AuthedUser {
                    id: user.id,
                    email: user.email,
                    name: user.name,
                    provider: user.provider,
                    created_at: user.created_at,
                    updated_at: user.updated_at,
                    is_admin,
                })
            }
            Err(failure) => {
                if failure.is_no_user() {
                    debug!(reason = %failure, "Request rejected by authorization gate");
                } else {
                    error!(error = %failure, "Authentication error in authorization gate");
                }
                Err(failure.into())
            }
        }
    }
}
