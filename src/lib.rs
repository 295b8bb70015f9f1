pub mod analytics;
pub mod auth;
pub mod category;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod health;
pub mod money;
pub mod openapi;
pub mod store;
pub mod transaction;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{web, HttpRequest};

use errors::AppError;

/// Malformed query strings are filter errors (bad period, month, type...)
fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidFilter(err.to_string()).into()
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(err.to_string()).into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound(err.to_string()).into()
}

/// Register every route except the rate-limited auth endpoints.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        // Health endpoint
        .service(health::health_check)
        .service(auth::me)
        // Category endpoints
        .service(category::list_categories)
        .service(category::create_category)
        // Transaction endpoints (order matters: specific routes before generic {id} routes)
        .service(transaction::list_transactions)
        .service(transaction::recent_transactions)
        .service(transaction::export_transactions)
        .service(transaction::create_transaction)
        .service(transaction::update_transaction)
        .service(transaction::delete_transaction)
        // Analytics endpoints
        .service(analytics::get_summary)
        .service(analytics::get_charts);
}

/// Register and login; main.rs wraps these in the rate limiter.
pub fn configure_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register).service(auth::login);
}
