use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::aggregate::{CategoryTotal, ChartData, TimelinePoint, Totals};
use super::filter::TransactionFilter;
use super::period::{Period, ResolvedPeriod};
use crate::errors::AppError;
use crate::transaction::models::{RecentQuery, TransactionType};

/// Query parameters shared by the list, summary, chart and export endpoints
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// monthly or yearly; omitted means all time
    pub period: Option<Period>,
    /// 1-12, required when period is monthly
    #[param(example = 3)]
    pub month: Option<u32>,
    /// Four-digit year, required when a period is given
    #[param(example = 2024)]
    pub year: Option<i32>,
    /// Restrict to one category
    pub category_id: Option<Uuid>,
    /// Restrict to expense or revenue
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

impl PeriodQuery {
    pub fn resolve(&self) -> Result<Option<ResolvedPeriod>, AppError> {
        self.period
            .map(|period| ResolvedPeriod::resolve(period, self.month, self.year))
            .transpose()
    }

    /// Build the shared predicate. Fails before any store access.
    pub fn to_filter(&self) -> Result<TransactionFilter, AppError> {
        let window = self.resolve()?.map(|resolved| resolved.window);

        Ok(TransactionFilter::new(window)
            .with_category(self.category_id)
            .with_type(self.transaction_type))
    }
}

impl From<&RecentQuery> for PeriodQuery {
    fn from(q: &RecentQuery) -> Self {
        Self {
            period: q.period,
            month: q.month,
            year: q.year,
            category_id: q.category_id,
            transaction_type: q.transaction_type,
        }
    }
}

/// Totals over the filtered set
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    #[serde(serialize_with = "crate::money::serialize")]
    #[schema(value_type = f64, example = 150.00)]
    pub total_expenses: Decimal,
    #[serde(serialize_with = "crate::money::serialize")]
    #[schema(value_type = f64, example = 2000.00)]
    pub total_revenues: Decimal,
    /// total_revenues - total_expenses
    #[serde(serialize_with = "crate::money::serialize")]
    #[schema(value_type = f64, example = 1850.00)]
    pub balance: Decimal,
    /// Number of transactions that contributed
    #[schema(example = 3)]
    pub transaction_count: usize,
}

impl From<Totals> for SummaryResponse {
    fn from(t: Totals) -> Self {
        Self {
            total_expenses: t.total_expenses,
            total_revenues: t.total_revenues,
            balance: t.balance,
            transaction_count: t.transaction_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryAmountResponse {
    #[schema(example = "Grocery")]
    pub category: String,
    #[schema(example = "")]
    pub icon: String,
    #[serde(serialize_with = "crate::money::serialize")]
    #[schema(value_type = f64, example = 150.00)]
    pub amount: Decimal,
}

impl From<CategoryTotal> for CategoryAmountResponse {
    fn from(c: CategoryTotal) -> Self {
        Self {
            category: c.name,
            icon: c.icon,
            amount: c.amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimelineEntryResponse {
    /// "Jan".."Dec" for a year, "1".."31" for a month
    #[schema(example = "Mar")]
    pub period_label: String,
    #[serde(serialize_with = "crate::money::serialize")]
    #[schema(value_type = f64, example = 150.00)]
    pub expenses: Decimal,
    #[serde(serialize_with = "crate::money::serialize")]
    #[schema(value_type = f64, example = 0.00)]
    pub revenues: Decimal,
}

impl From<TimelinePoint> for TimelineEntryResponse {
    fn from(p: TimelinePoint) -> Self {
        Self {
            period_label: p.label,
            expenses: p.expenses,
            revenues: p.revenues,
        }
    }
}

/// Category breakdown and time series
#[derive(Debug, Serialize, ToSchema)]
pub struct ChartDataResponse {
    pub expenses_by_category: Vec<CategoryAmountResponse>,
    pub timeline: Vec<TimelineEntryResponse>,
}

impl From<ChartData> for ChartDataResponse {
    fn from(c: ChartData) -> Self {
        Self {
            expenses_by_category: c.expenses_by_category.into_iter().map(Into::into).collect(),
            timeline: c.timeline.into_iter().map(Into::into).collect(),
        }
    }
}
