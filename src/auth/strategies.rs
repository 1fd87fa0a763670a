//! Authentication strategies
//!
//! A closed set of ways to establish who is making a request. Every variant goes
//! through [`Authenticator::authenticate`], which yields the current [`User`] or
//! an [`AuthFailure`] describing why not. Routes declare which variants they
//! accept through [`AuthRoute::accepts`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::models::{ExternalProfile, Provider, User};
use super::password::verify_password_blocking;
use super::token::{TokenError, TokenService};
use crate::common::{normalize_email, safe_email_log, ApiError};
use crate::users::store::{NewUser, StoreError, UserStore, UserUpdate};

/// Message shown for unknown emails and wrong passwords alike
pub const BAD_CREDENTIALS_MESSAGE: &str = "Incorrect email or password.";

/// Message returned by the authorization gate
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required. Please log in.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Local,
    Bearer,
    Delegated,
}

/// Routes that establish an identity, and the strategies each accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRoute {
    /// POST /auth/login
    Login,
    /// GET /auth/google/callback
    GoogleCallback,
    /// Any route behind the authorization gate
    Protected,
}

impl AuthRoute {
    pub fn accepts(&self) -> &'static [StrategyKind] {
        match self {
            AuthRoute::Login => &[StrategyKind::Local],
            AuthRoute::GoogleCallback => &[StrategyKind::Delegated],
            AuthRoute::Protected => &[StrategyKind::Bearer],
        }
    }
}

/// Input for one strategy evaluation
#[derive(Debug, Clone)]
pub enum Credentials {
    Local { email: String, password: String },
    Bearer { token: Option<String> },
    Delegated(ExternalProfile),
}

impl Credentials {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Credentials::Local { .. } => StrategyKind::Local,
            Credentials::Bearer { .. } => StrategyKind::Bearer,
            Credentials::Delegated(_) => StrategyKind::Delegated,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("{}", BAD_CREDENTIALS_MESSAGE)]
    NotFound,

    #[error("You previously signed in with {0}. Please use that method to log in.")]
    WrongProvider(Provider),

    #[error("{}", BAD_CREDENTIALS_MESSAGE)]
    BadCredentials,

    #[error("no session token presented")]
    NoToken,

    #[error("session token rejected: {0}")]
    InvalidToken(TokenError),

    #[error("session token refers to a user that no longer exists")]
    UnknownUser,

    #[error("strategy {0:?} is not accepted on this route")]
    StrategyNotAccepted(StrategyKind),

    #[error("credential store failure: {0}")]
    Store(#[from] StoreError),
}

impl AuthFailure {
    /// Whether the bearer strategy simply found nobody, as opposed to an error
    pub fn is_no_user(&self) -> bool {
        matches!(
            self,
            AuthFailure::NoToken | AuthFailure::InvalidToken(_) | AuthFailure::UnknownUser
        )
    }
}

impl From<AuthFailure> for ApiError {
    fn from(failure: AuthFailure) -> Self {
        match failure {
            AuthFailure::NotFound | AuthFailure::BadCredentials | AuthFailure::WrongProvider(_) => {
                ApiError::Unauthorized(failure.to_string())
            }
            AuthFailure::NoToken | AuthFailure::InvalidToken(_) | AuthFailure::UnknownUser => {
                ApiError::Unauthorized(AUTH_REQUIRED_MESSAGE.to_string())
            }
            AuthFailure::StrategyNotAccepted(_) => ApiError::BadRequest(failure.to_string()),
            AuthFailure::Store(e) => ApiError::from(e),
        }
    }
}

/// Runs strategies against the credential store and the token service
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Authenticate on `route`, refusing strategies the route does not accept
    pub async fn authenticate_for(
        &self,
        route: AuthRoute,
        credentials: Credentials,
    ) -> Result<User, AuthFailure> {
        let kind = credentials.kind();
        if !route.accepts().contains(&kind) {
            warn!(route = ?route, strategy = ?kind, "Strategy not accepted on route");
            return Err(AuthFailure::StrategyNotAccepted(kind));
        }
        self.authenticate(credentials).await
    }

    pub async fn authenticate(&self, credentials: Credentials) -> Result<User, AuthFailure> {
        match credentials {
            Credentials::Local { email, password } => self.local(&email, password).await,
            Credentials::Bearer { token } => self.bearer(token.as_deref()).await,
            Credentials::Delegated(profile) => self.delegated(profile).await,
        }
    }

    async fn local(&self, email: &str, password: String) -> Result<User, AuthFailure> {
        let user = match self.users.find_by_email(email).await? {
            Some(u) => u,
            None => {
                debug!(email = %safe_email_log(email), "Local login: no such user");
                return Err(AuthFailure::NotFound);
            }
        };

        if user.provider != Provider::Local {
            info!(
                user_id = %user.id,
                provider = %user.provider,
                "Local login attempted on delegated account"
            );
            return Err(AuthFailure::WrongProvider(user.provider));
        }

        let Some(hash) = user.password_hash.clone() else {
            return Err(AuthFailure::BadCredentials);
        };

        let matches = verify_password_blocking(password, hash)
            .await
            .map_err(StoreError::from)?;
        if !matches {
            debug!(user_id = %user.id, "Local login: password mismatch");
            return Err(AuthFailure::BadCredentials);
        }

        Ok(user)
    }

    async fn bearer(&self, token: Option<&str>) -> Result<User, AuthFailure> {
        let token = token.filter(|t| !t.is_empty()).ok_or(AuthFailure::NoToken)?;
        let claims = self.tokens.verify(token).map_err(AuthFailure::InvalidToken)?;

        // Re-resolve so accounts removed after issuance are rejected
        match self.users.find_by_id(&claims.sub).await? {
            Some(user) => Ok(user),
            None => {
                warn!(user_id = %claims.sub, "Token refers to missing user");
                Err(AuthFailure::UnknownUser)
            }
        }
    }

    async fn delegated(&self, profile: ExternalProfile) -> Result<User, AuthFailure> {
        if let Some(user) = self
            .users
            .find_by_provider_id(profile.provider, &profile.external_id)
            .await?
        {
            debug!(user_id = %user.id, provider = %profile.provider, "Delegated login: known account");
            return Ok(user);
        }

        let email = normalize_email(&profile.email);
        if let Some(existing) = self.users.find_by_email(&email).await? {
            info!(
                user_id = %existing.id,
                email = %safe_email_log(&email),
                provider = %profile.provider,
                "Linking delegated identity to existing account"
            );
            let linked = self
                .users
                .update(
                    &existing.id,
                    UserUpdate {
                        provider: Some(profile.provider),
                        provider_id: Some(profile.external_id),
                        ..Default::default()
                    },
                )
                .await?;
            return Ok(linked);
        }

        let name = if profile.name.trim().is_empty() {
            email.split('@').next().unwrap_or_default().to_string()
        } else {
            profile.name
        };

        let created = self
            .users
            .create(NewUser {
                email,
                name,
                password: None,
                provider: profile.provider,
                provider_id: Some(profile.external_id),
            })
            .await?;
        Ok(created)
    }
}
