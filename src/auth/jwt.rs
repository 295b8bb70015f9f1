use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};

use crate::errors::AppError;

use super::models::{TokenClaims, User};

/// Signing key and token lifetime, shared with handlers and the extractor
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: Secret<String>,
    pub token_ttl_hours: i64,
}

impl AuthSettings {
    pub fn new(jwt_secret: Secret<String>, token_ttl_hours: i64) -> Self {
        Self {
            jwt_secret,
            token_ttl_hours,
        }
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> u64 {
        (self.token_ttl_hours.max(0) as u64) * 3600
    }
}

/// Create a signed access token for a user
pub fn create_access_token(user: &User, settings: &AuthSettings) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(settings.token_ttl_hours);

    let claims = TokenClaims {
        sub: user.id,
        username: user.username.clone(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Failed to create access token: {e}")))
}

/// Decode and validate an access token
pub fn decode_token(token: &str, settings: &AuthSettings) -> Result<TokenClaims, AppError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn settings(secret: &str) -> AuthSettings {
        AuthSettings::new(Secret::new(secret.to_string()), 168)
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "demo".to_string(),
            email: "demo@example.com".to_string(),
            password_hash: String::new(),
            age: None,
            occupation: None,
            family_situation: None,
            monthly_spending_threshold: None,
            financial_goal: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_carries_user_identity() {
        let settings = settings("secret");
        let user = user();

        let token = create_access_token(&user, &settings).expect("Should sign token");
        let claims = decode_token(&token, &settings).expect("Should decode token");

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "demo");
        assert_eq!(claims.exp - claims.iat, 168 * 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let token = create_access_token(&user(), &settings("one")).unwrap();

        let result = decode_token(&token, &settings("two"));
        assert!(
            matches!(result, Err(AppError::Unauthorized(_))),
            "Foreign signature should be unauthorized"
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = AuthSettings::new(Secret::new("secret".to_string()), -2);
        let token = create_access_token(&user(), &expired).unwrap();

        assert!(decode_token(&token, &expired).is_err());
    }

    #[test]
    fn test_expires_in_seconds() {
        assert_eq!(settings("s").expires_in(), 604800);
    }
}
