use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::models::auth::{AuthenticatedUser, Claims};
use crate::models::user::User;

const BCRYPT_COST: u32 = 10;

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Issue a signed access token carrying the user's school scope and role.
pub fn issue_token(user: &User, secret: &str, ttl_seconds: u64) -> anyhow::Result<String> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        school_id: user.school_id.clone(),
        role: user.role(),
        iat: now,
        exp: now + ttl_seconds as usize,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Validate a token and extract its identity. Fails closed: expiry, signature
/// mismatch and malformed payloads all surface uniformly as None.
pub fn decode_token(token: &str, secret: &str) -> Option<AuthenticatedUser> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation).ok()?;
    let claims = data.claims;

    Some(AuthenticatedUser {
        user_id: claims.sub.parse().ok()?,
        email: claims.email,
        school_id: claims.school_id,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn sample_user() -> User {
        User {
            id: 7,
            email: "admin@school.lr".into(),
            password_hash: String::new(),
            name: "Admin".into(),
            role: "administrator".into(),
            school_id: Some("1700000000000".into()),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip() {
        let user = sample_user();
        let token = issue_token(&user, "secret", 3600).unwrap();
        let decoded = decode_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 7);
        assert_eq!(decoded.email, "admin@school.lr");
        assert_eq!(decoded.school_id.as_deref(), Some("1700000000000"));
        assert_eq!(decoded.role, UserRole::Administrator);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(&sample_user(), "secret", 3600).unwrap();
        assert!(decode_token(&token, "other-secret").is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        // jsonwebtoken applies a default 60s leeway; go well past it.
        let user = sample_user();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            school_id: None,
            role: UserRole::Superadmin,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(decode_token(&token, "secret").is_none());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(decode_token("not-a-token", "secret").is_none());
        assert!(decode_token("", "secret").is_none());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("s3cret-pw").unwrap();
        assert!(verify_password("s3cret-pw", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret-pw", "not-a-bcrypt-hash"));
    }
}
