use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::models::auth::AuthenticatedUser;
use crate::models::user::UserRole;
use crate::services::users::UserService;

/// Gate applied before every mutating school-scoped operation. A superadmin
/// token passes without a DB round trip; administrators are re-checked
/// against the users table so deactivation and reassignment take effect
/// before their token expires.
pub async fn require_school_access(
    pool: &PgPool,
    user: &AuthenticatedUser,
    school_id: &str,
) -> Result<(), (StatusCode, Json<Value>)> {
    if user.role == UserRole::Superadmin {
        return Ok(());
    }

    let allowed = UserService::can_manage_school(pool, user.user_id, school_id)
        .await
        .map_err(|e| {
            tracing::error!("school access check failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
        })?;

    if !allowed {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "You do not have permission to manage this school" })),
        ));
    }
    Ok(())
}
