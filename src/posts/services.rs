use super::models::{PostListResponse, PostRequest, PostResponse, PostRow};
use crate::common::{generate_post_id, timestamp_now, ApiError, Page};
use sqlx::SqlitePool;
use tracing::info;

pub const DEFAULT_POSTS_PER_PAGE: i64 = 9;

const POST_SELECT: &str = r#"
    SELECT p.id, p.author_id, u.name AS author_name, p.title, p.content,
           p.created_at, p.updated_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

pub struct PostsService {
    db: SqlitePool,
}

impl PostsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Newest posts first
    pub async fn list_posts(&self, page: Page) -> Result<PostListResponse, ApiError> {
        let total_posts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{} ORDER BY p.created_at DESC, p.rowid DESC LIMIT ? OFFSET ?",
            POST_SELECT
        ))
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        Ok(PostListResponse {
            posts: rows.into_iter().map(PostResponse::from).collect(),
            total_pages: page.total_pages(total_posts),
            current_page: page.page,
            total_posts,
        })
    }

    pub async fn find_post(&self, post_id: &str) -> Result<Option<PostRow>, ApiError> {
        sqlx::query_as::<_, PostRow>(&format!("{} WHERE p.id = ?", POST_SELECT))
            .bind(post_id)
            .fetch_optional(&self.db)
            .await
            .map_err(ApiError::DatabaseError)
    }

    pub async fn get_post(&self, post_id: &str) -> Result<PostRow, ApiError> {
        self.find_post(post_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Post not found.".to_string()))
    }

    pub async fn create_post(
        &self,
        author_id: &str,
        request: &PostRequest,
    ) -> Result<PostRow, ApiError> {
        let post_id = generate_post_id();
        let now = timestamp_now();

        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post_id)
        .bind(author_id)
        .bind(request.title.trim())
        .bind(&request.content)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        info!(post_id = %post_id, author_id = %author_id, "Post created");

        self.get_post(&post_id).await
    }

    pub async fn update_post(
        &self,
        post_id: &str,
        request: &PostRequest,
    ) -> Result<PostRow, ApiError> {
        let now = timestamp_now();

        let result = sqlx::query(
            r#"
            UPDATE posts SET title = ?, content = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(request.title.trim())
        .bind(&request.content)
        .bind(&now)
        .bind(post_id)
        .execute(&self.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Post not found.".to_string()));
        }

        info!(post_id = %post_id, "Post updated");

        self.get_post(post_id).await
    }

    /// Deletes the post; its comments go with it via ON DELETE CASCADE
    pub async fn delete_post(&self, post_id: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(post_id)
            .execute(&self.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Post not found.".to_string()));
        }

        info!(post_id = %post_id, "Post deleted");
        Ok(())
    }
}
