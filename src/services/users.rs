use sqlx::PgPool;

use crate::models::user::{UpdateUserRequest, User, UserRole};
use crate::services::auth;

/// Explicit column list for users; password_hash rides along internally and
/// is never serialized.
const USER_COLS: &str =
    "id, email, password_hash, name, role, school_id, is_active, created_at, updated_at";

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("School not found")]
    SchoolNotFound,
    // Unknown email and wrong password collapse into one message so callers
    // cannot enumerate accounts.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Account is deactivated")]
    AccountDeactivated,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
    pub school_id: Option<String>,
}

/// Core authorization predicate: active superadmins manage every school,
/// active administrators manage exactly their assigned school.
pub fn scope_allows(
    role: UserRole,
    user_school_id: Option<&str>,
    is_active: bool,
    school_id: &str,
) -> bool {
    if !is_active {
        return false;
    }
    match role {
        UserRole::Superadmin => true,
        UserRole::Administrator => user_school_id == Some(school_id),
    }
}

pub struct UserService;

impl UserService {
    pub async fn create(pool: &PgPool, data: NewUser) -> Result<User, UserError> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&data.email)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            return Err(UserError::DuplicateEmail);
        }

        if let Some(school_id) = &data.school_id {
            let school: Option<String> =
                sqlx::query_scalar("SELECT id FROM schools WHERE id = $1")
                    .bind(school_id)
                    .fetch_optional(pool)
                    .await?;
            if school.is_none() {
                return Err(UserError::SchoolNotFound);
            }
        }

        let password_hash = auth::hash_password(&data.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, name, role, school_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLS}"
        ))
        .bind(&data.email)
        .bind(&password_hash)
        .bind(&data.name)
        .bind(data.role.to_string())
        .bind(&data.school_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match &e {
            // Lost the pre-check race: unique constraint on email.
            sqlx::Error::Database(db) if db.is_unique_violation() => UserError::DuplicateEmail,
            _ => UserError::Db(e),
        })?;

        Ok(user)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Credentials are verified before the deactivation check so the
    /// "Account is deactivated" message is never disclosed to a caller who
    /// does not hold valid credentials.
    pub async fn login(
        pool: &PgPool,
        email: &str,
        password: &str,
        jwt_secret: &str,
        ttl_seconds: u64,
    ) -> Result<(User, String), UserError> {
        let user = Self::get_by_email(pool, email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !auth::verify_password(password, &user.password_hash) {
            return Err(UserError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(UserError::AccountDeactivated);
        }

        let token = auth::issue_token(&user, jwt_secret, ttl_seconds)?;
        Ok((user, token))
    }

    /// Partial update. An empty patch is a no-op returning the existing
    /// record; a supplied school_id is re-validated, explicit null clears it.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        patch: UpdateUserRequest,
    ) -> Result<Option<User>, UserError> {
        let Some(existing) = Self::get_by_id(pool, id).await? else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(existing));
        }

        let school_id = match patch.school_id {
            None => existing.school_id.clone(),
            Some(None) => None,
            Some(Some(sid)) => {
                let school: Option<String> =
                    sqlx::query_scalar("SELECT id FROM schools WHERE id = $1")
                        .bind(&sid)
                        .fetch_optional(pool)
                        .await?;
                if school.is_none() {
                    return Err(UserError::SchoolNotFound);
                }
                Some(sid)
            }
        };

        let name = patch.name.unwrap_or_else(|| existing.name.clone());
        let role = patch
            .role
            .map(|r| r.to_string())
            .unwrap_or_else(|| existing.role.clone());
        let password_hash = match patch.password {
            Some(pw) => auth::hash_password(&pw)?,
            None => existing.password_hash.clone(),
        };

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = $1, role = $2, school_id = $3, password_hash = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING {USER_COLS}"
        ))
        .bind(&name)
        .bind(&role)
        .bind(&school_id)
        .bind(&password_hash)
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(Some(user))
    }

    /// Soft deactivation; idempotent for any user that exists.
    pub async fn deactivate(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }
        sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(true)
    }

    /// Active users assigned to a school, name-ordered.
    pub async fn list_by_school(
        pool: &PgPool,
        school_id: &str,
    ) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLS} FROM users
             WHERE school_id = $1 AND is_active = TRUE
             ORDER BY name"
        ))
        .bind(school_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users ORDER BY name"))
            .fetch_all(pool)
            .await
    }

    /// Re-reads the user row so deactivation or reassignment is honored even
    /// while an old token is still circulating.
    pub async fn can_manage_school(
        pool: &PgPool,
        user_id: i64,
        school_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let Some(user) = Self::get_by_id(pool, user_id).await? else {
            return Ok(false);
        };
        Ok(scope_allows(
            user.role(),
            user.school_id.as_deref(),
            user.is_active,
            school_id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superadmin_manages_any_school() {
        assert!(scope_allows(UserRole::Superadmin, None, true, "s1"));
        assert!(scope_allows(UserRole::Superadmin, Some("s2"), true, "s1"));
    }

    #[test]
    fn administrator_manages_only_assigned_school() {
        assert!(scope_allows(UserRole::Administrator, Some("s1"), true, "s1"));
        assert!(!scope_allows(UserRole::Administrator, Some("s2"), true, "s1"));
        assert!(!scope_allows(UserRole::Administrator, None, true, "s1"));
    }

    #[test]
    fn inactive_users_manage_nothing() {
        assert!(!scope_allows(UserRole::Superadmin, None, false, "s1"));
        assert!(!scope_allows(UserRole::Administrator, Some("s1"), false, "s1"));
    }

    #[test]
    fn credential_errors_share_one_message() {
        assert_eq!(
            UserError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }
}
