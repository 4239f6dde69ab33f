use serde::{Deserialize, Serialize};

use super::user::UserRole;

/// Claims embedded in the access token. schoolId and role travel in the token
/// so route gates avoid a DB round trip for coarse checks; /api/auth/me is
/// the only endpoint that re-reads fresh DB state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub school_id: Option<String>,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

/// Identity extracted from a validated token, available via the axum extractor.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
    pub school_id: Option<String>,
    pub role: UserRole,
}
