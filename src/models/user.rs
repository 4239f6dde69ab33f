use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::double_option;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Administrator,
    Superadmin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Administrator => "administrator",
            UserRole::Superadmin => "superadmin",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(UserRole::Administrator),
            "superadmin" => Ok(UserRole::Superadmin),
            _ => Err(anyhow::anyhow!("Unknown role: {s}")),
        }
    }
}

/// DB row struct; role is kept as TEXT and parsed where a typed role is needed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub school_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> UserRole {
        self.role.parse().unwrap_or(UserRole::Administrator)
    }
}

// Request/Response DTOs

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub school_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Superadmin-created account; any role, optional school assignment.
#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Option<UserRole>,
    pub school_id: Option<String>,
}

/// Partial user update: absent fields retain prior values. school_id supports
/// explicit null to clear the assignment.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "double_option")]
    pub school_id: Option<Option<String>>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.role.is_none()
            && self.school_id.is_none()
            && self.password.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_id_absent_vs_null_vs_value() {
        let absent: UpdateUserRequest = serde_json::from_str(r#"{"name":"N"}"#).unwrap();
        assert_eq!(absent.school_id, None);

        let null: UpdateUserRequest = serde_json::from_str(r#"{"school_id":null}"#).unwrap();
        assert_eq!(null.school_id, Some(None));

        let set: UpdateUserRequest = serde_json::from_str(r#"{"school_id":"42"}"#).unwrap();
        assert_eq!(set.school_id, Some(Some("42".to_string())));
    }

    #[test]
    fn empty_patch_detection() {
        let empty: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());

        let named: UpdateUserRequest = serde_json::from_str(r#"{"name":"N"}"#).unwrap();
        assert!(!named.is_empty());

        // Explicit null school_id counts as a recognized change.
        let cleared: UpdateUserRequest = serde_json::from_str(r#"{"school_id":null}"#).unwrap();
        assert!(!cleared.is_empty());
    }

    #[test]
    fn password_hash_never_serialized() {
        let user = User {
            id: 1,
            email: "a@b.com".into(),
            password_hash: "$2b$10$secret".into(),
            name: "A".into(),
            role: "administrator".into(),
            school_id: None,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
    }
}
