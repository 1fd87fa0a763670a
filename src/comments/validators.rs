use super::models::CommentRequest;
use crate::common::{ValidationResult, Validator};

pub const MAX_COMMENT_LEN: usize = 2_000;

pub struct CommentValidator;

impl Validator<CommentRequest> for CommentValidator {
    fn validate(&self, data: &CommentRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if result.require("content", &data.content, "Comment content is required.") {
            result.max_len("content", &data.content, MAX_COMMENT_LEN);
        }

        result
    }
}
