use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::posts::models::AuthorSummary;

#[derive(FromRow, Debug, Clone)]
pub struct CommentRow {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub content: String,
    pub author: AuthorSummary,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CommentRow> for CommentResponse {
    fn from(row: CommentRow) -> Self {
        CommentResponse {
            id: row.id,
            post_id: row.post_id,
            content: row.content,
            author: AuthorSummary {
                id: row.author_id,
                name: row.author_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
    pub total_pages: i64,
    pub current_page: i64,
}

#[derive(Deserialize, Debug, Default)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: String,
}
