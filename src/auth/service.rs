use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::store::Store;

use super::jwt::{create_access_token, AuthSettings};
use super::models::{AuthTokenResponse, NewUser, RegisterDto, User};
use super::password::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Authentication service handling user registration and login logic
pub struct AuthService;

impl AuthService {
    /// Register a new user
    pub async fn register(store: &dyn Store, dto: RegisterDto) -> Result<User, AppError> {
        let username = dto.username.trim().to_string();
        let email = dto.email.trim().to_lowercase();

        // Hash password
        let password_hash = hash_password(&dto.password)?;

        let user = store
            .create_user(NewUser {
                username,
                email,
                password_hash,
                age: dto.age,
                occupation: dto.occupation,
                family_situation: dto.family_situation,
                monthly_spending_threshold: dto.monthly_spending_threshold,
                financial_goal: dto.financial_goal,
            })
            .await?;

        info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    /// Authenticate a user by username and password, return an access token
    pub async fn login(
        store: &dyn Store,
        settings: &AuthSettings,
        username: &str,
        password: &str,
    ) -> Result<AuthTokenResponse, AppError> {
        let user = store
            .find_user_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        // Verify password
        let is_valid = verify_password(password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = create_access_token(&user, settings)?;

        Ok(AuthTokenResponse::new(token, settings.expires_in(), &user))
    }

    /// Get user by ID
    pub async fn get_user_by_id(store: &dyn Store, user_id: Uuid) -> Result<User, AppError> {
        store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))
    }
}
