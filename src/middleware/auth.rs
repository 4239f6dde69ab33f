use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::models::auth::AuthenticatedUser;
use crate::services::auth::decode_token;

/// Extension type to carry the JWT secret through request extensions.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// A missing token is unauthenticated (401); a present-but-invalid token also
/// rejects with 401. Scope checks happen separately and reject with 403.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthenticated("Authentication required"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthenticated("Invalid Authorization header format"))?;

        let secret = parts.extensions.get::<JwtSecret>().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "JWT secret not configured" })),
        ))?;

        decode_token(token, &secret.0)
            .ok_or_else(|| unauthenticated("Invalid or expired token"))
    }
}

fn unauthenticated(msg: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg })))
}
