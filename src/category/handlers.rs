use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;
use crate::store::Store;

use super::models::{
    CategoryEnvelope, CategoryFilters, CategoryListResponse, CategoryResponse, CreateCategoryDto,
};
use super::service::CategoryService;

/// GET /categories - List categories, optionally of one type
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    params(CategoryFilters),
    responses(
        (status = 200, description = "Categories ordered by type and name", body = CategoryListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/categories")]
pub async fn list_categories(
    store: web::Data<dyn Store>,
    _auth: AuthenticatedUser,
    query: web::Query<CategoryFilters>,
) -> Result<HttpResponse, AppError> {
    let categories = CategoryService::list(store.get_ref(), query.category_type).await?;

    let response: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(CategoryListResponse {
        categories: response,
    }))
}

/// POST /categories - Create a new category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryEnvelope),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Category already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/categories")]
pub async fn create_category(
    store: web::Data<dyn Store>,
    _auth: AuthenticatedUser,
    body: web::Json<CreateCategoryDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let category = CategoryService::create(store.get_ref(), body.into_inner()).await?;

    Ok(HttpResponse::Created().json(CategoryEnvelope {
        message: "Category created successfully".to_string(),
        category: category.into(),
    }))
}
