use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

use crate::models::auth::AuthenticatedUser;
use crate::models::user::UserRole;

/// Role check for the /api/superadmin routes: a valid token with the wrong
/// role is forbidden, regardless of school assignment.
pub fn require_superadmin(user: &AuthenticatedUser) -> Result<(), (StatusCode, Json<Value>)> {
    if user.role != UserRole::Superadmin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Superadmin access required" })),
        ));
    }
    Ok(())
}
