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
        school::{GalleryItem, NewGalleryItem},
    },
    routes::{internal_error, map_upload_error},
    services::schools::SchoolService,
    AppState,
};

pub async fn add_gallery_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(body): Json<NewGalleryItem>,
) -> Result<(StatusCode, Json<GalleryItem>), (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    // Inline-encoded image takes precedence over a plain url.
    let url = match body.file_data.as_deref().filter(|f| f.starts_with("data:")) {
        Some(file_data) => {
            let folder = format!("islamic_schools/{id}/gallery");
            state
                .uploader
                .store(&folder, file_data)
                .await
                .map_err(map_upload_error)?
        }
        None => body.url.filter(|u| !u.is_empty()).ok_or((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Image URL or fileData is required" })),
        ))?,
    };

    SchoolService::add_gallery_item(&state.db, &id, &url, body.caption.as_deref())
        .await
        .map(|item| (StatusCode::CREATED, Json(item)))
        .map_err(internal_error)
}

pub async fn delete_gallery_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, gallery_id)): Path<(String, i64)>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    require_school_access(&state.db, &user, &id).await?;

    let deleted = SchoolService::delete_gallery_item(&state.db, &id, gallery_id)
        .await
        .map_err(internal_error)?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Gallery item not found" })),
        ));
    }
    Ok(Json(json!({ "message": "Deleted" })))
}
