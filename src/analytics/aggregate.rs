//! Pure aggregation over an already-filtered transaction set.

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::period::ResolvedPeriod;
use crate::category::models::Category;
use crate::errors::AppError;
use crate::transaction::models::{Transaction, TransactionType};

/// Expense, revenue and balance totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub total_expenses: Decimal,
    pub total_revenues: Decimal,
    pub balance: Decimal,
    pub transaction_count: usize,
}

/// Expense sum for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub name: String,
    pub icon: String,
    pub amount: Decimal,
}

/// Sums for one timeline bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelinePoint {
    pub label: String,
    pub expenses: Decimal,
    pub revenues: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartData {
    pub expenses_by_category: Vec<CategoryTotal>,
    pub timeline: Vec<TimelinePoint>,
}

/// Checked decimal addition; a sum past the `Decimal` range is an error,
/// never a partial result.
fn add(total: Decimal, amount: Decimal) -> Result<Decimal, AppError> {
    total
        .checked_add(amount)
        .ok_or_else(|| AppError::InternalError(format!("Sum overflow adding {amount}")))
}

pub fn totals(transactions: &[Transaction]) -> Result<Totals, AppError> {
    let mut total_expenses = Decimal::ZERO;
    let mut total_revenues = Decimal::ZERO;
    for t in transactions {
        match t.transaction_type {
            TransactionType::Expense => total_expenses = add(total_expenses, t.amount)?,
            TransactionType::Revenue => total_revenues = add(total_revenues, t.amount)?,
        }
    }

    let balance = total_revenues
        .checked_sub(total_expenses)
        .ok_or_else(|| AppError::InternalError("Balance overflow".to_string()))?;

    Ok(Totals {
        total_expenses,
        total_revenues,
        balance,
        transaction_count: transactions.len(),
    })
}

/// Expense sums grouped by category, largest first, ties by name.
pub fn expenses_by_category(
    transactions: &[Transaction],
    categories: &HashMap<Uuid, Category>,
) -> Result<Vec<CategoryTotal>, AppError> {
    let mut sums: HashMap<Uuid, Decimal> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
    {
        let sum = sums.entry(t.category_id).or_insert(Decimal::ZERO);
        *sum = add(*sum, t.amount)?;
    }

    let mut breakdown: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(category_id, amount)| {
            let (name, icon) = categories
                .get(&category_id)
                .map(|c| (c.name.clone(), c.icon.clone()))
                .unwrap_or_else(|| ("Unknown".to_string(), String::new()));
            CategoryTotal {
                category_id,
                name,
                icon,
                amount,
            }
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.name.cmp(&b.name))
            // Same name and amount: keep the output stable across runs
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    Ok(breakdown)
}

/// Zero-filled, chronological expense/revenue series over the period's buckets.
pub fn timeline(
    transactions: &[Transaction],
    period: &ResolvedPeriod,
) -> Result<Vec<TimelinePoint>, AppError> {
    let mut points: Vec<TimelinePoint> = period
        .bucket_labels()
        .into_iter()
        .map(|label| TimelinePoint {
            label,
            expenses: Decimal::ZERO,
            revenues: Decimal::ZERO,
        })
        .collect();

    for t in transactions {
        let Some(point) = period
            .bucket_index(t.date)
            .and_then(|index| points.get_mut(index))
        else {
            continue;
        };
        match t.transaction_type {
            TransactionType::Expense => point.expenses = add(point.expenses, t.amount)?,
            TransactionType::Revenue => point.revenues = add(point.revenues, t.amount)?,
        }
    }

    Ok(points)
}

pub fn chart_data(
    transactions: &[Transaction],
    categories: &HashMap<Uuid, Category>,
    period: &ResolvedPeriod,
) -> Result<ChartData, AppError> {
    Ok(ChartData {
        expenses_by_category: expenses_by_category(transactions, categories)?,
        timeline: timeline(transactions, period)?,
    })
}

/// Newest first: date descending, then creation time descending.
pub fn newest_first(a: &Transaction, b: &Transaction) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
