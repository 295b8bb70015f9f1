use uuid::Uuid;

use super::export;
use super::models::{RecentQuery, Transaction, TransactionDto, TransactionResponse};
use crate::analytics::models::PeriodQuery;
use crate::category::service::CategoryService;
use crate::errors::AppError;
use crate::store::Store;

/// Service layer for transaction business logic.
/// Every operation is scoped to the owner resolved from the request.
pub struct TransactionService;

impl TransactionService {
    /// List the owner's transactions matching the query, newest first.
    pub async fn list(
        store: &dyn Store,
        owner_id: Uuid,
        query: &PeriodQuery,
    ) -> Result<Vec<TransactionResponse>, AppError> {
        let filter = query.to_filter()?;

        let transactions = store.query(owner_id, &filter).await?;
        Self::with_categories(store, transactions).await
    }

    /// Leading rows of the list, for the dashboard.
    pub async fn recent(
        store: &dyn Store,
        owner_id: Uuid,
        query: &RecentQuery,
    ) -> Result<Vec<TransactionResponse>, AppError> {
        let rows = Self::list(store, owner_id, &PeriodQuery::from(query)).await?;
        Ok(export::recent(rows, query.limit))
    }

    /// The list rendered as CSV.
    pub async fn export_csv(
        store: &dyn Store,
        owner_id: Uuid,
        query: &PeriodQuery,
    ) -> Result<String, AppError> {
        let rows = Self::list(store, owner_id, query).await?;
        export::to_csv(&rows)
    }

    pub async fn create(
        store: &dyn Store,
        owner_id: Uuid,
        dto: TransactionDto,
    ) -> Result<TransactionResponse, AppError> {
        let new = dto.into_new()?;

        let created = store.insert(owner_id, new).await?;
        Self::with_category(store, created).await
    }

    /// Replace every field of an existing transaction.
    pub async fn replace(
        store: &dyn Store,
        owner_id: Uuid,
        transaction_id: Uuid,
        dto: TransactionDto,
    ) -> Result<TransactionResponse, AppError> {
        let new = dto.into_new()?;

        let replaced = store.replace(owner_id, transaction_id, new).await?;
        Self::with_category(store, replaced).await
    }

    pub async fn delete(
        store: &dyn Store,
        owner_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), AppError> {
        store.delete(owner_id, transaction_id).await
    }

    async fn with_category(
        store: &dyn Store,
        transaction: Transaction,
    ) -> Result<TransactionResponse, AppError> {
        let category = store.get_category(transaction.category_id).await?;
        Ok(TransactionResponse::from_parts(
            transaction,
            category.as_ref(),
        ))
    }

    async fn with_categories(
        store: &dyn Store,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<TransactionResponse>, AppError> {
        if transactions.is_empty() {
            return Ok(Vec::new());
        }

        let categories = CategoryService::catalogue(store).await?;
        Ok(transactions
            .into_iter()
            .map(|t| {
                let category = categories.get(&t.category_id);
                TransactionResponse::from_parts(t, category)
            })
            .collect())
    }
}
