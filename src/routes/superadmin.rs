use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    middleware::superadmin::require_superadmin,
    models::{
        auth::AuthenticatedUser,
        user::{CreateAdminRequest, UpdateUserRequest, User, UserRole},
    },
    routes::{internal_error, map_user_error},
    services::users::{NewUser, UserService},
    AppState,
};

/// Superadmin-created accounts may take any role and school assignment.
pub async fn create_admin(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<User>), (StatusCode, Json<Value>)> {
    require_superadmin(&user)?;

    UserService::create(
        &state.db,
        NewUser {
            email: body.email,
            password: body.password,
            name: body.name,
            role: body.role.unwrap_or(UserRole::Administrator),
            school_id: body.school_id,
        },
    )
    .await
    .map(|created| (StatusCode::CREATED, Json(created)))
    .map_err(map_user_error)
}

pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<User>>, (StatusCode, Json<Value>)> {
    require_superadmin(&user)?;

    UserService::list_all(&state.db)
        .await
        .map(Json)
        .map_err(internal_error)
}

pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    require_superadmin(&user)?;

    UserService::update(&state.db, id, body)
        .await
        .map_err(map_user_error)?
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        ))
}

/// Soft deactivation; the row is kept for audit history.
pub async fn deactivate_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_superadmin(&user)?;

    let ok = UserService::deactivate(&state.db, id)
        .await
        .map_err(internal_error)?;
    if !ok {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        ));
    }
    Ok(Json(json!({ "message": "User deactivated" })))
}
