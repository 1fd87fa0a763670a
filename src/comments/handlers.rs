// src/comments/handlers.rs

use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::warn;

use super::models::{CommentListResponse, CommentRequest, CommentResponse};
use super::services::{CommentsService, DEFAULT_COMMENTS_PER_PAGE};
use super::validators::CommentValidator;
use crate::auth::models::MessageResponse;
use crate::auth::ownership::{ensure_can_modify, Action};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState, PageParams, Validator};

/// GET /posts/:post_id/comments?page=&limit=
pub async fn list_comments(
    Extension(state): Extension<Arc<AppState>>,
    Path(post_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<CommentListResponse>, ApiError> {
    let service = CommentsService::new(state.db.clone());
    let response = service
        .list_comments(&post_id, params.resolve(DEFAULT_COMMENTS_PER_PAGE))
        .await?;
    Ok(Json(response))
}

/// POST /posts/:post_id/comments
pub async fn create_comment(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path(post_id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let validation = CommentValidator.validate(&request);
    if !validation.is_valid {
        warn!(user_id = %authed.id, errors = ?validation.errors, "Comment validation failed");
        return Err(ApiError::from(validation));
    }

    let service = CommentsService::new(state.db.clone());
    let comment = service.create_comment(&post_id, &authed.id, &request).await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

/// PUT /posts/:post_id/comments/:comment_id - author or admin only
pub async fn update_comment(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path((post_id, comment_id)): Path<(String, String)>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let service = CommentsService::new(state.db.clone());
    let existing = service.get_comment(&post_id, &comment_id).await?;
    ensure_can_modify(&authed, &existing.author_id, Action::Edit, "comment")?;

    CommentValidator.validate(&request).into_result()?;

    let comment = service
        .update_comment(&post_id, &comment_id, &request)
        .await?;
    Ok(Json(CommentResponse::from(comment)))
}

/// DELETE /posts/:post_id/comments/:comment_id - author or admin only
pub async fn delete_comment(
    Extension(state): Extension<Arc<AppState>>,
    authed: AuthedUser,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let service = CommentsService::new(state.db.clone());
    let existing = service.get_comment(&post_id, &comment_id).await?;
    ensure_can_modify(&authed, &existing.author_id, Action::Delete, "comment")?;

    service.delete_comment(&post_id, &comment_id).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully.")))
}
