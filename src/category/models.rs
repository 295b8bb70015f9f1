use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::transaction::models::TransactionType;

/// A category partitions transactions by type: only transactions of the
/// same type may reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub category_type: TransactionType,
    pub icon: String,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub category_type: TransactionType,
    pub icon: String,
}

/// Category information returned in responses
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    #[schema(example = "Grocery")]
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    #[schema(example = "")]
    pub icon: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            category_type: c.category_type,
            icon: c.icon,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryEnvelope {
    #[schema(example = "Category created successfully")]
    pub message: String,
    pub category: CategoryResponse,
}

/// Request body for creating a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    /// Category name (1-50 characters)
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    #[schema(example = "Groceries")]
    pub name: String,

    /// expense or revenue
    #[serde(rename = "type")]
    pub category_type: TransactionType,

    /// Display icon (defaults to empty)
    #[validate(length(max = 50, message = "Icon cannot exceed 50 characters"))]
    #[serde(default)]
    pub icon: String,
}

/// Query parameters for listing categories
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryFilters {
    /// Only categories of this type
    #[serde(rename = "type")]
    pub category_type: Option<TransactionType>,
}
