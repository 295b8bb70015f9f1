use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;
use crate::store::Store;

use super::jwt::AuthSettings;
use super::models::{AuthTokenResponse, LoginDto, RegisterDto, RegisterResponse, UserResponseDto};
use super::service::AuthService;

/// POST /register - Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "User created", body = RegisterResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse)
    )
)]
#[post("/register")]
pub async fn register(
    store: web::Data<dyn Store>,
    body: web::Json<RegisterDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = AuthService::register(store.get_ref(), body.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User created successfully".to_string(),
        user: UserResponseDto::from_user(&user),
    }))
}

/// POST /login - Authenticate and get a token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Login successful", body = AuthTokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    settings: web::Data<AuthSettings>,
    body: web::Json<LoginDto>,
) -> Result<HttpResponse, AppError> {
    let response =
        AuthService::login(store.get_ref(), settings.get_ref(), &body.username, &body.password)
            .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// GET /me - Get current user info
#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user profile", body = UserResponseDto),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/me")]
pub async fn me(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = AuthService::get_user_by_id(store.get_ref(), auth.user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponseDto::from_user(&user)))
}
