// src/posts/handlers.rs

use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::warn;

use super::models::{PostListResponse, PostRequest, PostResponse};
use super::services::{PostsService, DEFAULT_POSTS_PER_PAGE};
use super::validators::PostValidator;
use crate::auth::models::MessageResponse;
use crate::auth::ownership::{ensure_can_modify, Action};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, PageParams, Validator};

/// GET /posts?page=&limit=
pub async fn list_posts(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<PostListResponse>, ApiError> {
    let service = PostsService::new(state.db.clone());
    let response = service
        .list_posts(params.resolve(DEFAULT_POSTS_PER_PAGE))
        .await?;
    Ok(Json(response))
}

/// GET /posts/:post_id
pub async fn get_post(
    Extension(state): Extension<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let service = PostsService::new(state.db.clone());
    let post = service.get_post(&post_id).await?;
    Ok(Json(PostResponse::from(post)))
}

/// POST /posts - the caller becomes the author
pub async fn create_post(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Json(request): Json<PostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let validation = PostValidator.validate(&request);
    if !validation.is_valid {
        warn!(user_id = %authed.id, errors = ?validation.errors, "Post validation failed");
        return Err(ApiError::from(validation));
    }

    let service = PostsService::new(state.db.clone());
    let post = service.create_post(&authed.id, &request).await?;
    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// PUT /posts/:post_id - author or admin only
pub async fn update_post(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(post_id): Path<String>,
    Json(request): Json<PostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let service = PostsService::new(state.db.clone());
    let existing = service.get_post(&post_id).await?;
    ensure_can_modify(&authed, &existing.author_id, Action::Edit, "post")?;

    PostValidator.validate(&request).into_result()?;

    let post = service.update_post(&post_id, &request).await?;
    Ok(Json(PostResponse::from(post)))
}

/// DELETE /posts/:post_id - author or admin only
pub async fn delete_post(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(post_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let service = PostsService::new(state.db.clone());
    let existing = service.get_post(&post_id).await?;
    ensure_can_modify(&authed, &existing.author_id, Action::Delete, "post")?;

    service.delete_post(&post_id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully.")))
}
