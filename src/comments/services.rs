use super::models::{CommentListResponse, CommentRequest, CommentResponse, CommentRow};
use crate::common::{generate_comment_id, timestamp_now, ApiError, Page};
use sqlx::SqlitePool;
use tracing::info;

pub const DEFAULT_COMMENTS_PER_PAGE: i64 = 5;

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.post_id, c.author_id, u.name AS author_name, c.content,
           c.created_at, c.updated_at
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

pub struct CommentsService {
    db: SqlitePool,
}

impl CommentsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    async fn ensure_post_exists(&self, post_id: &str) -> Result<(), ApiError> {
        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        match exists {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound("Post not found.".to_string())),
        }
    }

    /// Newest comments first. An unknown post simply has no comments.
    pub async fn list_comments(
        &self,
        post_id: &str,
        page: Page,
    ) -> Result<CommentListResponse, ApiError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{} WHERE c.post_id = ? ORDER BY c.created_at DESC, c.rowid DESC LIMIT ? OFFSET ?",
            COMMENT_SELECT
        ))
        .bind(post_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(CommentListResponse {
            comments: rows.into_iter().map(CommentResponse::from).collect(),
            total_pages: page.total_pages(total),
            current_page: page.page,
        })
    }

    /// Looks a comment up within its post; a comment under another post is not found
    pub async fn get_comment(&self, post_id: &str, comment_id: &str) -> Result<CommentRow, ApiError> {
        sqlx::query_as::<_, CommentRow>(&format!(
            "{} WHERE c.id = ? AND c.post_id = ?",
            COMMENT_SELECT
        ))
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Comment not found.".to_string()))
    }

    pub async fn create_comment(
        &self,
        post_id: &str,
        author_id: &str,
        request: &CommentRequest,
    ) -> Result<CommentRow, ApiError> {
        self.ensure_post_exists(post_id).await?;

        let comment_id = generate_comment_id();
        let now = timestamp_now();

        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&comment_id)
        .bind(post_id)
        .bind(author_id)
        .bind(request.content.trim())
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(comment_id = %comment_id, post_id = %post_id, author_id = %author_id, "Comment created");

        self.get_comment(post_id, &comment_id).await
    }

    pub async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        request: &CommentRequest,
    ) -> Result<CommentRow, ApiError> {
        let now = timestamp_now();

        let result = sqlx::query(
            "UPDATE comments SET content = ?, updated_at = ? WHERE id = ? AND post_id = ?",
        )
        .bind(request.content.trim())
        .bind(&now)
        .bind(comment_id)
        .bind(post_id)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Comment not found.".to_string()));
        }

        info!(comment_id = %comment_id, "Comment updated");

        self.get_comment(post_id, comment_id).await
    }

    pub async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ? AND post_id = ?")
            .bind(comment_id)
            .bind(post_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Comment not found.".to_string()));
        }

        info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }
}
