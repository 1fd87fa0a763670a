use super::models::PostRequest;
use crate::common::{ValidationResult, Validator};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_CONTENT_LEN: usize = 50_000;

pub struct PostValidator;

impl Validator<PostRequest> for PostValidator {
    fn validate(&self, data: &PostRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.title.trim().is_empty() || data.content.trim().is_empty() {
            result.add_error("fields", "Title and content are required.");
            return result;
        }

        result.max_len("title", data.title.trim(), MAX_TITLE_LEN);
        result.max_len("content", &data.content, MAX_CONTENT_LEN);

        result
    }
}
