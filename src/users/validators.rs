use super::models::UpdateProfileRequest;
use crate::auth::validators::{MAX_NAME_LEN, MAX_PASSWORD_LEN};
use crate::common::{ValidationResult, Validator};

pub struct UpdateProfileValidator;

impl Validator<UpdateProfileRequest> for UpdateProfileValidator {
    fn validate(&self, data: &UpdateProfileRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = &data.name {
            if result.require("name", name, "Name cannot be empty.") {
                result.max_len("name", name.trim(), MAX_NAME_LEN);
            }
        }

        if let Some(password) = &data.password {
            if password.is_empty() {
                result.add_error("password", "Password cannot be empty.");
            }
            result.max_len("password", password, MAX_PASSWORD_LEN);
        }

        result
    }
}
