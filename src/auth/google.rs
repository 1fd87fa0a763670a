// src/auth/google.rs
//! Delegated login through Google OAuth 2.0
//!
//! The authorization-code exchange and profile lookup sit behind
//! [`OAuthProvider`] so the callback handler can be exercised without network.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use super::models::{ExternalProfile, Provider};
use crate::common::config::GoogleOAuthConfig;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Provider profile is missing {0}")]
    IncompleteProfile(&'static str),
}

#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// URL the browser is sent to, carrying `state` for the callback check
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for the user's verified profile
    async fn exchange_code(&self, code: &str) -> Result<ExternalProfile, OAuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: Option<String>,
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    config: GoogleOAuthConfig,
    client: Client,
}

impl GoogleOAuth {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, OAuthError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuth {
    fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.callback_url),
            urlencoding::encode("openid email profile"),
            urlencoding::encode(state)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<ExternalProfile, OAuthError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.callback_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(OAuthError::OAuthFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let tokens = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| OAuthError::SerializationError(e.to_string()))?;

        let response = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            error!(status = %status, "Userinfo request failed");
            return Err(OAuthError::OAuthFailed(format!("userinfo HTTP {}", status)));
        }

        let info = response
            .json::<UserInfo>()
            .await
            .map_err(|e| OAuthError::SerializationError(e.to_string()))?;

        profile_from_userinfo(info)
    }
}

fn profile_from_userinfo(info: UserInfo) -> Result<ExternalProfile, OAuthError> {
    let external_id = info.sub.ok_or(OAuthError::IncompleteProfile("sub"))?;
    let email = info.email.ok_or(OAuthError::IncompleteProfile("email"))?;
    if info.email_verified == Some(false) {
        return Err(OAuthError::OAuthFailed("email address is not verified".to_string()));
    }

    Ok(ExternalProfile {
        provider: Provider::Google,
        external_id,
        email,
        name: info.name.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google() -> GoogleOAuth {
        GoogleOAuth::new(GoogleOAuthConfig {
            client_id: "client-id.apps".to_string(),
            client_secret: "shh".to_string(),
            callback_url: "http://localhost:3000/auth/google/callback".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_authorization_url() {
        let url = google().authorization_url("NONCE123");

        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=client-id.apps"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgoogle%2Fcallback"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("state=NONCE123"));
        assert!(!url.contains("shh"));
    }

    #[test]
    fn test_profile_from_userinfo() {
        let profile = profile_from_userinfo(UserInfo {
            sub: Some("1093".to_string()),
            email: Some("g@blog.dev".to_string()),
            email_verified: Some(true),
            name: Some("Gee".to_string()),
        })
        .unwrap();

        assert_eq!(profile.provider, Provider::Google);
        assert_eq!(profile.external_id, "1093");
        assert_eq!(profile.name, "Gee");
    }

    #[test]
    fn test_profile_requires_sub_and_verified_email() {
        let missing_sub = profile_from_userinfo(UserInfo {
            sub: None,
            email: Some("g@blog.dev".to_string()),
            email_verified: None,
            name: None,
        });
        assert!(matches!(missing_sub, Err(OAuthError::IncompleteProfile("sub"))));

        let unverified = profile_from_userinfo(UserInfo {
            sub: Some("1".to_string()),
            email: Some("g@blog.dev".to_string()),
            email_verified: Some(false),
            name: None,
        });
        assert!(matches!(unverified, Err(OAuthError::OAuthFailed(_))));
    }
}
