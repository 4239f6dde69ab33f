use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    models::school::Testimonial, routes::internal_error, services::schools::SchoolService,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct NewTestimonial {
    pub author: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
}

/// Public submission; visitors can leave a testimonial without an account.
pub async fn add_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<NewTestimonial>,
) -> Result<(StatusCode, Json<Testimonial>), (StatusCode, Json<Value>)> {
    let text = body.text.filter(|t| !t.is_empty()).ok_or((
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Testimonial text is required" })),
    ))?;

    let exists = SchoolService::exists(&state.db, &id)
        .await
        .map_err(internal_error)?;
    if !exists {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "School not found" })),
        ));
    }

    SchoolService::add_testimonial(
        &state.db,
        &id,
        body.author.as_deref(),
        body.title.as_deref(),
        &text,
    )
    .await
    .map(|t| (StatusCode::CREATED, Json(t)))
    .map_err(internal_error)
}
