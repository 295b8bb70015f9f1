use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::analytics::models::{
    CategoryAmountResponse, ChartDataResponse, SummaryResponse, TimelineEntryResponse,
};
use crate::analytics::period::Period;
use crate::auth::models::{
    AuthTokenResponse, LoginDto, RegisterDto, RegisterResponse, UserResponseDto,
};
use crate::category::models::{
    CategoryEnvelope, CategoryListResponse, CategoryResponse, CreateCategoryDto,
};
use crate::errors::ErrorResponse;
use crate::transaction::models::{
    MessageResponse, TransactionDto, TransactionEnvelope, TransactionListResponse,
    TransactionResponse, TransactionType,
};

/// Security scheme modifier for Bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT access token from /login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Spendwise API",
        version = "1.0.0",
        description = "Personal finance tracking: transactions, categories and period analytics",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Categories", description = "Expense and revenue categories"),
        (name = "Transactions", description = "Owner-scoped transaction records"),
        (name = "Analytics", description = "Period totals, category breakdown and timeline")
    ),
    paths(
        crate::health::health_check,
        // Auth endpoints
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::me,
        // Category endpoints
        crate::category::handlers::list_categories,
        crate::category::handlers::create_category,
        // Transaction endpoints
        crate::transaction::handlers::list_transactions,
        crate::transaction::handlers::recent_transactions,
        crate::transaction::handlers::export_transactions,
        crate::transaction::handlers::create_transaction,
        crate::transaction::handlers::update_transaction,
        crate::transaction::handlers::delete_transaction,
        // Analytics endpoints
        crate::analytics::handlers::get_summary,
        crate::analytics::handlers::get_charts,
    ),
    components(
        schemas(
            // Error response
            ErrorResponse,
            // Auth schemas
            RegisterDto,
            RegisterResponse,
            LoginDto,
            UserResponseDto,
            AuthTokenResponse,
            // Category schemas
            CategoryResponse,
            CategoryListResponse,
            CategoryEnvelope,
            CreateCategoryDto,
            // Transaction schemas
            TransactionType,
            TransactionDto,
            TransactionResponse,
            TransactionListResponse,
            TransactionEnvelope,
            MessageResponse,
            // Analytics schemas
            Period,
            SummaryResponse,
            CategoryAmountResponse,
            TimelineEntryResponse,
            ChartDataResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/health",
            "/register",
            "/login",
            "/me",
            "/categories",
            "/transactions",
            "/transactions/recent",
            "/transactions/export",
            "/transactions/{id}",
            "/analytics/summary",
            "/analytics/charts",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "Missing path {expected}"
            );
        }
    }
}
