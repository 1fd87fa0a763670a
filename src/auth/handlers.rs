//! Authentication handlers

use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::extractors::AuthedUser;
use super::models::{
    LoginRequest, LoginResponse, MessageResponse, OAuthCallbackParams, Provider, PublicUser,
    RegisterRequest,
};
use super::session::{
    clear_session, cleared_oauth_state_cookie, oauth_state_cookie, set_session,
    OAUTH_STATE_COOKIE,
};
use super::strategies::{AuthRoute, Credentials};
use super::validators::{LoginValidator, RegisterValidator};
use crate::common::{generate_raw_id, safe_email_log, ApiError, AppState, Validator};
use crate::users::store::NewUser;

/// POST /auth/register
/// Creates a local account. The client logs in separately afterwards.
///
/// # Request Body
/// ```json
/// { "name": "Ada", "email": "ada@example.com", "password": "..." }
/// ```
pub async fn register(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let validation = RegisterValidator.validate(&payload);
    if !validation.is_valid {
        warn!(errors = ?validation.errors, "Registration validation failed");
        return Err(ApiError::from(validation));
    }

    if state.users.find_by_email(&payload.email).await?.is_some() {
        info!(email = %safe_email_log(&payload.email), "Registration rejected: email taken");
        return Err(ApiError::Conflict(
            "An account with this email already exists.".to_string(),
        ));
    }

    // The store hashes the password before it is written
    let user = state
        .users
        .create(NewUser {
            email: payload.email,
            name: payload.name,
            password: Some(payload.password),
            provider: Provider::Local,
            provider_id: None,
        })
        .await?;

    info!(user_id = %user.id, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Account created successfully. Please log in.",
        )),
    ))
}

/// POST /auth/login
/// Local email/password login; sets the session cookie on success
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let validation = LoginValidator.validate(&payload);
    if !validation.is_valid {
        return Err(ApiError::from(validation));
    }

    let user = state
        .authenticator
        .authenticate_for(
            AuthRoute::Login,
            Credentials::Local {
                email: payload.email,
                password: payload.password,
            },
        )
        .await?;

    let token = state.tokens.issue(&user).map_err(|e| {
        error!(error = %e, user_id = %user.id, "JWT encoding error during login");
        ApiError::InternalServer("jwt error".to_string())
    })?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User login successful"
    );

    let jar = set_session(jar, token, &state.config);
    Ok((
        jar,
        Json(LoginResponse {
            message: "Logged in successfully".to_string(),
            user: PublicUser::from(user),
        }),
    ))
}

/// GET /auth/google
/// Starts the Google OAuth flow with a fresh `state` nonce
pub async fn google_oauth_start(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let oauth = state.oauth.as_ref().ok_or_else(|| {
        warn!("Google OAuth requested but not configured");
        ApiError::ServiceUnavailable("Google login is not configured.".to_string())
    })?;

    let nonce = generate_raw_id(32);
    let auth_url = oauth.authorization_url(&nonce);

    info!("Redirecting to Google OAuth");
    Ok((
        jar.add(oauth_state_cookie(nonce, &state.config)),
        Redirect::to(&auth_url),
    ))
}

/// GET /auth/google/callback
/// Finishes the OAuth flow. Failures never render JSON: the browser is sent
/// to the frontend login page instead.
pub async fn google_oauth_callback(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<OAuthCallbackParams>,
) -> (CookieJar, Redirect) {
    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = jar.add(cleared_oauth_state_cookie(&state.config));
    let failure = |jar: CookieJar| {
        let url = format!("{}?error=oauth_failed", state.config.frontend_login_url);
        (jar, Redirect::to(&url))
    };

    if let Some(err) = params.error.as_deref() {
        warn!(oauth_error = %err, "Google OAuth returned error");
        return failure(jar);
    }

    let Some(oauth) = state.oauth.as_ref() else {
        warn!("Google OAuth callback hit but provider not configured");
        return failure(jar);
    };

    match (expected_state.as_deref(), params.state.as_deref()) {
        (Some(expected), Some(received)) if !expected.is_empty() && expected == received => {}
        _ => {
            warn!("OAuth state mismatch on callback");
            return failure(jar);
        }
    }

    let Some(code) = params.code.as_deref() else {
        warn!("No authorization code in OAuth callback");
        return failure(jar);
    };

    let profile = match oauth.exchange_code(code).await {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "Failed to exchange authorization code");
            return failure(jar);
        }
    };

    let user = match state
        .authenticator
        .authenticate_for(AuthRoute::GoogleCallback, Credentials::Delegated(profile))
        .await
    {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "Delegated authentication failed");
            return failure(jar);
        }
    };

    let token = match state.tokens.issue(&user) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "JWT encoding error during OAuth callback");
            return failure(jar);
        }
    };

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        provider = "google",
        "User authentication successful via Google OAuth"
    );

    let jar = set_session(jar, token, &state.config);
    (jar, Redirect::to(&state.config.frontend_url))
}

/// GET /auth/me
/// Returns the current authenticated user, as resolved by the gate
#[axum::debug_handler]
pub async fn me_handler(authed: AuthedUser) -> Json<PublicUser> {
    Json(PublicUser::from(authed))
}

/// POST /auth/logout
/// Overwrites the session cookie with an expired one. Tokens are stateless, so
/// this only affects the client holding the cookie.
pub async fn logout_handler(
    Extension(state): Extension<Arc<AppState>>,
    jar: CookieJar,
) -> impl IntoResponse {
    info!("User logout");
    (
        clear_session(jar, &state.config),
        Json(MessageResponse::new("Logged out successfully")),
    )
}
