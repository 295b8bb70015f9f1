use actix_web::{get, web, HttpResponse};

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;
use crate::store::Store;

use super::models::{ChartDataResponse, PeriodQuery, SummaryResponse};
use super::service::AnalyticsService;

/// GET /analytics/summary - Totals for the selected period
#[utoipa::path(
    get,
    path = "/analytics/summary",
    tag = "Analytics",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Expense and revenue totals", body = SummaryResponse),
        (status = 400, description = "Invalid period or filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/analytics/summary")]
pub async fn get_summary(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let totals = AnalyticsService::summary(store.get_ref(), auth.user_id, &query).await?;

    Ok(HttpResponse::Ok().json(SummaryResponse::from(totals)))
}

/// GET /analytics/charts - Category breakdown and timeline for the selected period
#[utoipa::path(
    get,
    path = "/analytics/charts",
    tag = "Analytics",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Chart series", body = ChartDataResponse),
        (status = 400, description = "Missing or invalid period", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/analytics/charts")]
pub async fn get_charts(
    store: web::Data<dyn Store>,
    auth: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let charts = AnalyticsService::charts(store.get_ref(), auth.user_id, &query).await?;

    Ok(HttpResponse::Ok().json(ChartDataResponse::from(charts)))
}
