use super::models::{LoginRequest, RegisterRequest};
use crate::common::{is_plausible_email, ValidationResult, Validator};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_PASSWORD_LEN: usize = 128;

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() || data.email.trim().is_empty() || data.password.is_empty()
        {
            result.add_error("fields", "Name, email, and password are required.");
            return result;
        }

        result.max_len("name", data.name.trim(), MAX_NAME_LEN);
        result.max_len("email", data.email.trim(), MAX_EMAIL_LEN);
        result.max_len("password", &data.password, MAX_PASSWORD_LEN);

        if !is_plausible_email(&data.email) {
            result.add_error("email", "Email address is not valid.");
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.email.trim().is_empty() || data.password.is_empty() {
            result.add_error("fields", "Email and password are required.");
        }

        result
    }
}
