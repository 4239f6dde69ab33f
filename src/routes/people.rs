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
        school::{NewPerson, Person, PersonPatch},
    },
    routes::{internal_error, map_upload_error},
    services::{placement, schools::SchoolService},
    AppState,
};

pub async fn list_people(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Person>>, (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    SchoolService::list_people(&state.db, &id)
        .await
        .map(Json)
        .map_err(internal_error)
}

/// Public: the principal/vice-principal slot layout consumed by the school
/// profile page.
pub async fn get_administration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<placement::AdministrationSlots>, (StatusCode, Json<Value>)> {
    let exists = SchoolService::exists(&state.db, &id)
        .await
        .map_err(internal_error)?;
    if !exists {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "School not found" })),
        ));
    }

    let people = SchoolService::list_people(&state.db, &id)
        .await
        .map_err(internal_error)?;
    Ok(Json(placement::assign_slots(&people)))
}

pub async fn add_person(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(body): Json<NewPerson>,
) -> Result<(StatusCode, Json<Person>), (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    let image = match body.file_data.as_deref().filter(|f| f.starts_with("data:")) {
        Some(file_data) => {
            let folder = format!("islamic_schools/{id}/people");
            Some(
                state
                    .uploader
                    .store(&folder, file_data)
                    .await
                    .map_err(map_upload_error)?,
            )
        }
        None => body.photo.clone(),
    };

    SchoolService::add_person(
        &state.db,
        &id,
        &body.name,
        &body.role,
        body.bio.as_deref(),
        image.as_deref(),
        body.display_order.unwrap_or(0),
    )
    .await
    .map(|person| (StatusCode::CREATED, Json(person)))
    .map_err(internal_error)
}

pub async fn update_person(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, person_id)): Path<(String, i64)>,
    Json(mut body): Json<PersonPatch>,
) -> Result<Json<Person>, (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    if let Some(file_data) = body.file_data.take().filter(|f| f.starts_with("data:")) {
        let folder = format!("islamic_schools/{id}/people");
        body.image = Some(
            state
                .uploader
                .store(&folder, &file_data)
                .await
                .map_err(map_upload_error)?,
        );
    }

    SchoolService::update_person(&state.db, &id, person_id, &body)
        .await
        .map_err(internal_error)?
        .map(Json)
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Person not found" })),
        ))
}

pub async fn delete_person(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, person_id)): Path<(String, i64)>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    let deleted = SchoolService::delete_person(&state.db, &id, person_id)
        .await
        .map_err(internal_error)?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Person not found" })),
        ));
    }
    Ok(Json(json!({ "message": "Deleted" })))
}
