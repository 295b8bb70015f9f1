use uuid::Uuid;

use super::aggregate::{self, ChartData, Totals};
use super::models::PeriodQuery;
use crate::category::service::CategoryService;
use crate::errors::AppError;
use crate::store::Store;

/// Service layer for the dashboard's aggregate views.
pub struct AnalyticsService;

impl AnalyticsService {
    /// Totals over the owner's transactions matching the query.
    pub async fn summary(
        store: &dyn Store,
        owner_id: Uuid,
        query: &PeriodQuery,
    ) -> Result<Totals, AppError> {
        let filter = query.to_filter()?;

        let transactions = store.query(owner_id, &filter).await?;
        aggregate::totals(&transactions)
    }

    /// Category breakdown and zero-filled timeline. Needs a concrete period.
    pub async fn charts(
        store: &dyn Store,
        owner_id: Uuid,
        query: &PeriodQuery,
    ) -> Result<ChartData, AppError> {
        let resolved = query.resolve()?.ok_or_else(|| {
            AppError::InvalidFilter("period is required for chart data".to_string())
        })?;
        let filter = query.to_filter()?;

        let transactions = store.query(owner_id, &filter).await?;
        let categories = CategoryService::catalogue(store).await?;

        aggregate::chart_data(&transactions, &categories, &resolved)
    }
}
