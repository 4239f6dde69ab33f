use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    middleware::school_access::require_school_access,
    models::{
        auth::AuthenticatedUser,
        school::{NewSchool, School, SchoolUpdate},
    },
    routes::internal_error,
    services::schools::SchoolService,
    AppState,
};

pub async fn list_schools(
    State(state): State<AppState>,
) -> Result<Json<Vec<School>>, (StatusCode, Json<Value>)> {
    SchoolService::get_all(&state.db)
        .await
        .map(Json)
        .map_err(internal_error)
}

pub async fn get_school(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<School>, (StatusCode, Json<Value>)> {
    SchoolService::get_by_id(&state.db, &id)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "School not found" })),
        ))
}

/// Deliberately unauthenticated: school records can be submitted by anyone
/// (self-service onboarding). Flagged for product sign-off in DESIGN.md.
pub async fn create_school(
    State(state): State<AppState>,
    Json(body): Json<NewSchool>,
) -> Result<(StatusCode, Json<School>), (StatusCode, Json<Value>)> {
    SchoolService::create(&state.db, body)
        .await
        .map(|school| (StatusCode::CREATED, Json(school)))
        .map_err(internal_error)
}

pub async fn update_school(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(body): Json<SchoolUpdate>,
) -> Result<Json<School>, (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    SchoolService::update(&state.db, &id, body)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "School not found" })),
        ))
}

pub async fn delete_school(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    let deleted = SchoolService::delete(&state.db, &id)
        .await
        .map_err(internal_error)?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "School not found" })),
        ));
    }
    Ok(Json(json!({ "message": "School deleted successfully" })))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Empty query is an empty result, not "all schools".
pub async fn search_schools(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<School>>, (StatusCode, Json<Value>)> {
    let q = query.q.unwrap_or_default();
    if q.is_empty() {
        return Ok(Json(vec![]));
    }
    SchoolService::search(&state.db, &q)
        .await
        .map(Json)
        .map_err(internal_error)
}
