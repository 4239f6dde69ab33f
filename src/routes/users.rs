use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::{
    middleware::school_access::require_school_access, models::auth::AuthenticatedUser,
    models::user::User, routes::internal_error, services::users::UserService, AppState,
};

/// Active administrator accounts assigned to a school.
pub async fn list_school_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    UserService::list_by_school(&state.db, &id)
        .await
        .map(Json)
        .map_err(internal_error)
}
