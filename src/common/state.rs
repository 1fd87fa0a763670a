// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use super::config::AppConfig;
use crate::auth::google::OAuthProvider;
use crate::auth::strategies::Authenticator;
use crate::auth::token::TokenService;
use crate::users::store::{SqliteUserStore, UserStore};

/// Read-only application state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub tokens: TokenService,
    pub authenticator: Authenticator,
    /// `None` when Google credentials are not configured
    pub oauth: Option<Arc<dyn OAuthProvider>>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig, oauth: Option<Arc<dyn OAuthProvider>>) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(SqliteUserStore::new(db.clone()));
        let tokens = TokenService::new(&config.jwt_secret, config.token_ttl);
        let authenticator = Authenticator::new(users.clone(), tokens.clone());

        Self {
            db,
            config: Arc::new(config),
            users,
            tokens,
            authenticator,
            oauth,
        }
    }
}
