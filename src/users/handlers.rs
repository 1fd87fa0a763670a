// src/users/handlers.rs

use axum::extract::{Extension, Json, Path};
use std::sync::Arc;
use tracing::{info, warn};

use super::models::UpdateProfileRequest;
use super::store::UserUpdate;
use super::validators::UpdateProfileValidator;
use crate::auth::models::{Provider, PublicUser};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, Validator};

/// GET /users/:id - Public profile, never includes the password hash
pub async fn get_user(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    Ok(Json(PublicUser::from(user)))
}

/// PUT /users/me - Update the caller's name and/or password
pub async fn update_me(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let validation = UpdateProfileValidator.validate(&request);
    if !validation.is_valid {
        warn!(user_id = %authed.id, errors = ?validation.errors, "Profile update validation failed");
        return Err(ApiError::from(validation));
    }

    let current = state
        .users
        .find_by_id(&authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    if request.password.is_some() && current.provider != Provider::Local {
        return Err(ApiError::BadRequest(format!(
            "Password cannot be set for accounts that sign in with {}.",
            current.provider
        )));
    }

    let password_changed = request.password.is_some();
    let updated = state
        .users
        .update(
            &authed.id,
            UserUpdate {
                name: request.name,
                password: request.password,
                ..Default::default()
            },
        )
        .await?;

    info!(
        user_id = %updated.id,
        password_changed = password_changed,
        "Profile updated"
    );

    Ok(Json(PublicUser::from(updated)))
}
