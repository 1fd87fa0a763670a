use serde::Deserialize;

/// PUT /users/me body; absent fields are left unchanged
#[derive(Deserialize, Debug, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}
