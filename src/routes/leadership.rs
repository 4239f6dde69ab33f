use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    middleware::school_access::require_school_access,
    models::{
        auth::AuthenticatedUser,
        school::{LeadershipInput, LeadershipMember, LeadershipPatch},
    },
    routes::internal_error,
    services::schools::SchoolService,
    AppState,
};

pub async fn add_leadership_member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(body): Json<LeadershipInput>,
) -> Result<(StatusCode, Json<LeadershipMember>), (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    SchoolService::add_leadership_member(&state.db, &id, &body)
        .await
        .map(|member| (StatusCode::CREATED, Json(member)))
        .map_err(internal_error)
}

pub async fn update_leadership_member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, member_id)): Path<(String, i64)>,
    Json(body): Json<LeadershipPatch>,
) -> Result<Json<LeadershipMember>, (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    SchoolService::update_leadership_member(&state.db, &id, member_id, &body)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Leadership member not found" })),
        ))
}

pub async fn delete_leadership_member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, member_id)): Path<(String, i64)>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    let deleted = SchoolService::delete_leadership_member(&state.db, &id, member_id)
        .await
        .map_err(internal_error)?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Leadership member not found" })),
        ));
    }
    Ok(Json(json!({ "message": "Deleted" })))
}
