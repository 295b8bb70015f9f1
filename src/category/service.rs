use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use super::models::{Category, CreateCategoryDto, NewCategory};
use crate::errors::AppError;
use crate::store::Store;
use crate::transaction::models::TransactionType;

/// Categories every fresh installation starts with
const DEFAULT_CATEGORIES: &[(&str, TransactionType)] = &[
    ("Grocery", TransactionType::Expense),
    ("Transport", TransactionType::Expense),
    ("Utilities", TransactionType::Expense),
    ("Entertainment", TransactionType::Expense),
    ("Health", TransactionType::Expense),
    ("Others", TransactionType::Expense),
    ("Salary", TransactionType::Revenue),
    ("Freelance", TransactionType::Revenue),
    ("Investments", TransactionType::Revenue),
    ("Others", TransactionType::Revenue),
];

/// Service layer for category logic.
pub struct CategoryService;

impl CategoryService {
    pub async fn list(
        store: &dyn Store,
        category_type: Option<TransactionType>,
    ) -> Result<Vec<Category>, AppError> {
        store.list_categories(category_type).await
    }

    pub async fn create(store: &dyn Store, dto: CreateCategoryDto) -> Result<Category, AppError> {
        // Trim and sanitize name
        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Name cannot be empty".to_string(),
            ));
        }

        store
            .create_category(NewCategory {
                name,
                category_type: dto.category_type,
                icon: dto.icon.trim().to_string(),
            })
            .await
    }

    /// All categories keyed by id, for joining names onto transactions.
    pub async fn catalogue(store: &dyn Store) -> Result<HashMap<Uuid, Category>, AppError> {
        Ok(store
            .list_categories(None)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect())
    }

    /// Seed the default categories into an empty store.
    pub async fn seed_defaults(store: &dyn Store) -> Result<(), AppError> {
        if store.count_categories().await? > 0 {
            return Ok(());
        }

        for (name, category_type) in DEFAULT_CATEGORIES {
            store
                .create_category(NewCategory {
                    name: name.to_string(),
                    category_type: *category_type,
                    icon: String::new(),
                })
                .await?;
        }
        info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());

        Ok(())
    }
}
