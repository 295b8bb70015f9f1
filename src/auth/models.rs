use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ============================================================================
// User Models
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub occupation: Option<String>,
    pub family_situation: Option<String>,
    pub monthly_spending_threshold: Option<Decimal>,
    pub financial_goal: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Hashed registration data handed to the store
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub occupation: Option<String>,
    pub family_situation: Option<String>,
    pub monthly_spending_threshold: Option<Decimal>,
    pub financial_goal: Option<String>,
}

fn validate_threshold(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("must be non-negative"));
    }
    if *value > crate::money::MAX_AMOUNT {
        return Err(ValidationError::new("too large"));
    }
    Ok(())
}

/// Request body for user registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterDto {
    #[validate(length(min = 3, max = 80, message = "Username must be 3-80 characters"))]
    #[schema(example = "demo")]
    pub username: String,
    #[validate(email(message = "Email must be a valid address"))]
    #[schema(example = "demo@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "demo123")]
    pub password: String,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,
    #[validate(length(max = 100))]
    pub occupation: Option<String>,
    #[validate(length(max = 50))]
    pub family_situation: Option<String>,
    #[validate(custom(
        function = "validate_threshold",
        message = "Monthly spending threshold must be between 0 and 9999999999.99"
    ))]
    #[schema(value_type = Option<f64>, example = 1500.00)]
    pub monthly_spending_threshold: Option<Decimal>,
    #[validate(length(max = 200))]
    pub financial_goal: Option<String>,
}

/// Request body for user login
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginDto {
    #[schema(example = "demo")]
    pub username: String,
    #[schema(example = "demo123")]
    pub password: String,
}

/// User profile returned in responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    #[schema(example = "demo")]
    pub username: String,
    #[schema(example = "demo@example.com")]
    pub email: String,
    pub age: Option<i32>,
    pub occupation: Option<String>,
    pub family_situation: Option<String>,
    #[serde(serialize_with = "serialize_optional_money")]
    #[schema(value_type = Option<f64>, example = 1500.00)]
    pub monthly_spending_threshold: Option<Decimal>,
    pub financial_goal: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn serialize_optional_money<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(amount) => crate::money::serialize(amount, serializer),
        None => serializer.serialize_none(),
    }
}

impl UserResponseDto {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            age: user.age,
            occupation: user.occupation.clone(),
            family_situation: user.family_situation.clone(),
            monthly_spending_threshold: user.monthly_spending_threshold,
            financial_goal: user.financial_goal.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub user: UserResponseDto,
}

// ============================================================================
// Token Models
// ============================================================================

/// JWT access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,        // User ID
    pub username: String, // Login name
    pub iat: usize,       // Issued at
    pub exp: usize,       // Expiration
}

/// Response to a successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthTokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: &'static str,
    /// Access token lifetime in seconds
    #[schema(example = 604800)]
    pub expires_in: u64,
    pub user: UserResponseDto,
}

impl AuthTokenResponse {
    pub fn new(token: String, expires_in: u64, user: &User) -> Self {
        Self {
            token,
            token_type: "Bearer",
            expires_in,
            user: UserResponseDto::from_user(user),
        }
    }
}
