//! Tests for posts module

#[cfg(test)]
mod tests {
    use super::super::validators::PostValidator;
    use super::super::models::PostRequest;
    use crate::common::test_support::{
        body_json, register_and_login, send, test_app, test_state, ADMIN_EMAIL,
    };
    use crate::common::pagination::MAX_PAGE;
    use crate::common::Validator;
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};

    async fn create_post(app: &Router, token: &str, title: &str) -> Value {
        let response = send(
            app,
            Method::POST,
            "/posts",
            Some(json!({ "title": title, "content": "Body text" })),
            Some(token),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[test]
    fn test_post_validator() {
        let empty = PostValidator.validate(&PostRequest::default());
        assert!(!empty.is_valid);
        assert_eq!(empty.errors[0].message, "Title and content are required.");

        let long = PostValidator.validate(&PostRequest {
            title: "t".repeat(201),
            content: "body".to_string(),
        });
        assert!(!long.is_valid);

        let ok = PostValidator.validate(&PostRequest {
            title: "Hello".to_string(),
            content: "World".to_string(),
        });
        assert!(ok.is_valid);
    }

    #[tokio::test]
    async fn test_create_requires_session() {
        let app = test_app(test_state(None).await);
        let response = send(
            &app,
            Method::POST,
            "/posts",
            Some(json!({ "title": "Hi", "content": "There" })),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_and_get_post_with_author() {
        let app = test_app(test_state(None).await);
        let token = register_and_login(&app, "Ada", "ada@blog.dev", "correct horse").await;

        let created = create_post(&app, &token, "First post").await;
        let post_id = created["id"].as_str().expect("id").to_string();
        assert!(post_id.starts_with("P_"));
        assert_eq!(created["author"]["name"], "Ada");

        let response = send(&app, Method::GET, &format!("/posts/{}", post_id), None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["title"], "First post");
        assert_eq!(body["content"], "Body text");

        let missing = send(&app, Method::GET, "/posts/P_NOPE0000", None, None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let app = test_app(test_state(None).await);
        let token = register_and_login(&app, "Ada", "ada@blog.dev", "correct horse").await;

        let response = send(
            &app,
            Method::POST,
            "/posts",
            Some(json!({ "title": "No body" })),
            Some(&token),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Title and content are required.");
    }

    #[tokio::test]
    async fn test_list_posts_paginates_newest_first() {
        let app = test_app(test_state(None).await);
        let token = register_and_login(&app, "Ada", "ada@blog.dev", "correct horse").await;

        for i in 0..12 {
            create_post(&app, &token, &format!("Post {}", i)).await;
        }

        let response = send(&app, Method::GET, "/posts", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["totalPosts"], 12);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["posts"].as_array().map(Vec::len), Some(9));
        assert_eq!(body["posts"][0]["title"], "Post 11");

        let response = send(&app, Method::GET, "/posts?page=3&limit=5", None, None).await;
        let body = body_json(response).await;
        assert_eq!(body["currentPage"], 3);
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["posts"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["posts"][1]["title"], "Post 0");
    }

    #[tokio::test]
    async fn test_list_posts_with_huge_page_is_empty() {
        let app = test_app(test_state(None).await);
        let token = register_and_login(&app, "Ada", "ada@blog.dev", "correct horse").await;
        create_post(&app, &token, "Only post").await;

        let uri = format!("/posts?page={}&limit=9", i64::MAX);
        let response = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["totalPosts"], 1);
        assert_eq!(body["currentPage"], MAX_PAGE);
        assert_eq!(body["posts"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_only_owner_or_admin_can_modify() {
        let app = test_app(test_state(None).await);
        let owner = register_and_login(&app, "Ada", "ada@blog.dev", "correct horse").await;
        let other = register_and_login(&app, "Eve", "eve@blog.dev", "correct horse").await;
        let admin = register_and_login(&app, "Admin", ADMIN_EMAIL, "correct horse").await;

        let post = create_post(&app, &owner, "Mine").await;
        let uri = format!("/posts/{}", post["id"].as_str().expect("id"));
        let edit = json!({ "title": "Edited", "content": "New body" });

        let response = send(&app, Method::PUT, &uri, Some(edit.clone()), Some(&other)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "Forbidden: You do not have permission to edit this post."
        );

        let response = send(&app, Method::DELETE, &uri, None, Some(&other)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "Forbidden: You do not have permission to delete this post."
        );

        let response = send(&app, Method::PUT, &uri, Some(edit), Some(&owner)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["title"], "Edited");

        let admin_edit = json!({ "title": "Moderated", "content": "Cleaned up" });
        let response = send(&app, Method::PUT, &uri, Some(admin_edit), Some(&admin)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::DELETE, &uri, None, Some(&admin)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Post deleted successfully.");

        let response = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_fields() {
        let app = test_app(test_state(None).await);
        let token = register_and_login(&app, "Ada", "ada@blog.dev", "correct horse").await;
        let post = create_post(&app, &token, "Draft").await;
        let uri = format!("/posts/{}", post["id"].as_str().expect("id"));

        let blank = json!({ "title": " ", "content": "Body" });
        let response = send(&app, Method::PUT, &uri, Some(blank), Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Title and content are required.");

        let response = send(&app, Method::GET, &uri, None, None).await;
        let body = body_json(response).await;
        assert_eq!(body["title"], "Draft");
    }

    #[tokio::test]
    async fn test_modify_missing_post_is_not_found() {
        let app = test_app(test_state(None).await);
        let token = register_and_login(&app, "Ada", "ada@blog.dev", "correct horse").await;

        let response = send(&app, Method::DELETE, "/posts/P_NOPE0000", None, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
