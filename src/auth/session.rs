//! Session cookie handling
//!
//! The session token travels in an httpOnly `token` cookie. The OAuth `state`
//! nonce uses a separate short-lived cookie that must be `SameSite=Lax`, since
//! the provider's redirect back to us is a cross-site navigation.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

use crate::common::config::AppConfig;

pub const SESSION_COOKIE: &str = "token";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

const OAUTH_STATE_TTL_MINUTES: i64 = 10;

/// Read the session token, if any
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Cookie carrying a freshly issued session token
pub fn session_cookie(token: String, config: &AppConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(config.environment.is_production())
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::seconds(config.token_ttl.num_seconds()))
        .build()
}

/// Empty, already-expired cookie that overwrites the session on the client
pub fn cleared_session_cookie(config: &AppConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(config.environment.is_production())
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

pub fn set_session(jar: CookieJar, token: String, config: &AppConfig) -> CookieJar {
    jar.add(session_cookie(token, config))
}

pub fn clear_session(jar: CookieJar, config: &AppConfig) -> CookieJar {
    jar.add(cleared_session_cookie(config))
}

pub fn oauth_state_cookie(state: String, config: &AppConfig) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, state))
        .http_only(true)
        .secure(config.environment.is_production())
        .same_site(SameSite::Lax)
        .path("/auth/google")
        .max_age(Duration::minutes(OAUTH_STATE_TTL_MINUTES))
        .build()
}

pub fn cleared_oauth_state_cookie(config: &AppConfig) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, ""))
        .http_only(true)
        .secure(config.environment.is_production())
        .same_site(SameSite::Lax)
        .path("/auth/google")
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}
