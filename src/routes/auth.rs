use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    models::{
        auth::AuthenticatedUser,
        user::{AuthResponse, LoginRequest, RegisterRequest, User, UserRole},
    },
    routes::{internal_error, map_user_error},
    services::users::{NewUser, UserService},
    AppState,
};

/// Self-service registration always creates an administrator account;
/// superadmins are only created through /api/superadmin/create-admin.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, Json<Value>)> {
    let user = UserService::create(
        &state.db,
        NewUser {
            email: body.email,
            password: body.password.clone(),
            name: body.name,
            role: UserRole::Administrator,
            school_id: body.school_id,
        },
    )
    .await
    .map_err(map_user_error)?;

    let (user, token) = UserService::login(
        &state.db,
        &user.email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_expiry_seconds,
    )
    .await
    .map_err(map_user_error)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, Json<Value>)> {
    UserService::login(
        &state.db,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_expiry_seconds,
    )
    .await
    .map(|(user, token)| Json(AuthResponse { user, token }))
    .map_err(map_user_error)
}

/// Re-reads the user row so the profile reflects reassignment or
/// deactivation that happened after the token was issued.
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<User>, (StatusCode, Json<Value>)> {
    UserService::get_by_id(&state.db, user.user_id)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        ))
}
