use actix_web::{delete, get, http::header, post, put, web, HttpResponse};
use validator::Validate;

use crate::analytics::models::PeriodQuery;
use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;
use crate::store::Store;

use super::models::{
    MessageResponse, RecentQuery, TransactionDto, TransactionEnvelope, TransactionIdPath,
    TransactionListResponse,
};
use super::service::TransactionService;

/// GET /transactions - List transactions matching the period and filters
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Transactions",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Transactions, newest first", body = TransactionListResponse),
        (status = 400, description = "Invalid period or filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions")]
pub async fn list_transactions(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let transactions = TransactionService::list(store.get_ref(), auth.user_id, &query).await?;

    Ok(HttpResponse::Ok().json(TransactionListResponse { transactions }))
}

/// GET /transactions/recent - Most recent transactions for the dashboard
#[utoipa::path(
    get,
    path = "/transactions/recent",
    tag = "Transactions",
    params(RecentQuery),
    responses(
        (status = 200, description = "Leading rows of the list", body = TransactionListResponse),
        (status = 400, description = "Invalid limit, period or filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions/recent")]
pub async fn recent_transactions(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    query: web::Query<RecentQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let transactions = TransactionService::recent(store.get_ref(), auth.user_id, &query).await?;

    Ok(HttpResponse::Ok().json(TransactionListResponse { transactions }))
}

/// GET /transactions/export - Download the list as CSV
#[utoipa::path(
    get,
    path = "/transactions/export",
    tag = "Transactions",
    params(PeriodQuery),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 400, description = "Invalid period or filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions/export")]
pub async fn export_transactions(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let csv = TransactionService::export_csv(store.get_ref(), auth.user_id, &query).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"transactions.csv\"",
        ))
        .body(csv))
}

/// POST /transactions - Record a new transaction
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "Transactions",
    request_body = TransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = TransactionEnvelope),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 422, description = "Unknown category or type mismatch", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/transactions")]
pub async fn create_transaction(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    body: web::Json<TransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let transaction =
        TransactionService::create(store.get_ref(), auth.user_id, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(TransactionEnvelope {
        message: "Transaction created successfully".to_string(),
        transaction,
    }))
}

/// PUT /transactions/{id} - Replace a transaction
#[utoipa::path(
    put,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    request_body = TransactionDto,
    responses(
        (status = 200, description = "Transaction updated", body = TransactionEnvelope),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Transaction belongs to another user", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 422, description = "Unknown category or type mismatch", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/transactions/{id}")]
pub async fn update_transaction(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
    body: web::Json<TransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let transaction = TransactionService::replace(
        store.get_ref(),
        auth.user_id,
        path.id,
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(TransactionEnvelope {
        message: "Transaction updated successfully".to_string(),
        transaction,
    }))
}

/// DELETE /transactions/{id} - Delete a transaction
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction deleted", body = MessageResponse),
        (status = 403, description = "Transaction belongs to another user", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/transactions/{id}")]
pub async fn delete_transaction(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    TransactionService::delete(store.get_ref(), auth.user_id, path.id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Transaction deleted successfully".to_string(),
    }))
}
