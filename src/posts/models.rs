// src/posts/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Post joined with its author's display name
#[derive(FromRow, Debug, Clone)]
pub struct PostRow {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Author reference embedded in post and comment responses
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: AuthorSummary,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        PostResponse {
            id: row.id,
            title: row.title,
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
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total_posts: i64,
}

/// Body for both POST /posts and PUT /posts/:id
#[derive(Deserialize, Debug, Default)]
pub struct PostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}
