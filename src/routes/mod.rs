pub mod auth;
pub mod gallery;
pub mod health;
pub mod leadership;
pub mod people;
pub mod schools;
pub mod superadmin;
pub mod testimonials;
pub mod users;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::services::uploads::UploadError;
use crate::services::users::UserError;

pub(crate) fn internal_error<E: std::fmt::Display>(e: E) -> (StatusCode, Json<Value>) {
    tracing::error!("{e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

/// Credential and validation failures surface their caller-actionable
/// message; everything else collapses to a generic 500.
pub(crate) fn map_user_error(e: UserError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        UserError::DuplicateEmail | UserError::SchoolNotFound => StatusCode::BAD_REQUEST,
        UserError::InvalidCredentials | UserError::AccountDeactivated => StatusCode::UNAUTHORIZED,
        UserError::Db(_) | UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        return internal_error(e);
    }
    (status, Json(json!({ "error": e.to_string() })))
}

pub(crate) fn map_upload_error(e: UploadError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        UploadError::InvalidDataUri => StatusCode::BAD_REQUEST,
        UploadError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        UploadError::Upstream(inner) => {
            tracing::error!("image upload failed: {inner}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": e.to_string() })))
}
