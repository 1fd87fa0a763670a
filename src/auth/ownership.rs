//! Resource ownership checks for post and comment mutations

use tracing::warn;

use super::extractors::AuthedUser;
use crate::common::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    Delete,
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

/// Allow the mutation when the caller owns the resource or is an administrator.
///
/// `resource` is the noun used in the 403 message, e.g. "post".
pub fn ensure_can_modify(
    user: &AuthedUser,
    owner_id: &str,
    action: Action,
    resource: &str,
) -> Result<(), ApiError> {
    if user.id == owner_id || user.is_admin {
        return Ok(());
    }

    warn!(
        user_id = %user.id,
        owner_id = %owner_id,
        action = action.verb(),
        resource = resource,
        "Ownership check failed"
    );
    Err(ApiError::Forbidden(format!(
        "Forbidden: You do not have permission to {} this {}.",
        action.verb(),
        resource
    )))
}
