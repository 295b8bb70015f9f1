use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::analytics::period::Period;
use crate::category::models::Category;
use crate::errors::AppError;
use crate::money;

/// Transaction type enum, also used to partition categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money spent
    Expense,
    /// Money received
    Revenue,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Revenue => "revenue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "expense" => Some(TransactionType::Expense),
            "revenue" => Some(TransactionType::Revenue),
            _ => None,
        }
    }
}

/// A stored transaction. Only ever replaced as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub date: NaiveDate,
    pub category_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub created_at: DateTime<Utc>,
}

/// Validated field set for insert and replace.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub category_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
}

/// Validate that amount is positive, within the stored column range and
/// has at most two fraction digits
fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_must_be_positive"));
    }
    if *amount > money::MAX_AMOUNT {
        return Err(ValidationError::new("amount_too_large"));
    }
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::new("amount_too_precise"));
    }
    Ok(())
}

/// Request body for creating or replacing a transaction
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransactionDto {
    /// Calendar date (YYYY-MM-DD)
    #[schema(value_type = String, example = "2024-03-05")]
    pub date: NaiveDate,

    /// Category; its type must match `type`
    pub category_id: Uuid,

    /// Description (1-200 characters)
    #[validate(length(min = 1, max = 200, message = "Description must be 1-200 characters"))]
    #[schema(example = "Weekly groceries")]
    pub description: String,

    /// Amount (positive, at most 9999999999.99 and 2 decimal places)
    #[validate(custom(
        function = "validate_amount",
        message = "Amount must be positive, at most 9999999999.99, with at most 2 decimal places"
    ))]
    #[schema(value_type = f64, example = 42.50)]
    pub amount: Decimal,

    /// expense or revenue
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl TransactionDto {
    /// Trim the description and hand back the store-facing field set.
    pub fn into_new(self) -> Result<NewTransaction, AppError> {
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(AppError::ValidationError(
                "Description cannot be empty".to_string(),
            ));
        }

        Ok(NewTransaction {
            date: self.date,
            category_id: self.category_id,
            description,
            amount: self.amount,
            transaction_type: self.transaction_type,
        })
    }
}

/// Transaction information returned in responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: Uuid,
    /// Calendar date (YYYY-MM-DD)
    #[schema(value_type = String, example = "2024-03-05")]
    pub date: NaiveDate,
    pub category_id: Uuid,
    #[schema(example = "Grocery")]
    pub category_name: String,
    #[schema(example = "")]
    pub category_icon: String,
    #[schema(example = "Weekly groceries")]
    pub description: String,
    #[serde(serialize_with = "crate::money::serialize")]
    #[schema(value_type = f64, example = 42.50)]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl TransactionResponse {
    /// Join a transaction with its category's display fields.
    pub fn from_parts(t: Transaction, category: Option<&Category>) -> Self {
        let (category_name, category_icon) = match category {
            Some(c) => (c.name.clone(), c.icon.clone()),
            None => ("Unknown".to_string(), String::new()),
        };

        Self {
            id: t.id,
            date: t.date,
            category_id: t.category_id,
            category_name,
            category_icon,
            description: t.description,
            amount: t.amount,
            transaction_type: t.transaction_type,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionEnvelope {
    #[schema(example = "Transaction created successfully")]
    pub message: String,
    pub transaction: TransactionResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Transaction deleted successfully")]
    pub message: String,
}

fn default_recent_limit() -> usize {
    5
}

/// Query parameters for the recent-transactions projection
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    pub period: Option<Period>,
    #[param(example = 3)]
    pub month: Option<u32>,
    #[param(example = 2024)]
    pub year: Option<i32>,
    pub category_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,

    /// Number of rows (1-50)
    #[validate(range(min = 1, max = 50))]
    #[serde(default = "default_recent_limit")]
    #[param(example = 5)]
    pub limit: usize,
}

/// Path parameters for transaction ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionIdPath {
    /// Transaction UUID
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn dto(description: &str, amount: Decimal) -> TransactionDto {
        TransactionDto {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            category_id: Uuid::new_v4(),
            description: description.to_string(),
            amount,
            transaction_type: TransactionType::Expense,
        }
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(dto("Lunch", dec!(0)).validate().is_err());
        assert!(dto("Lunch", dec!(-5)).validate().is_err());
        assert!(dto("Lunch", dec!(12.5)).validate().is_ok());
    }

    #[test]
    fn test_amount_bounded_by_column_range() {
        assert!(dto("Car", money::MAX_AMOUNT).validate().is_ok());
        assert!(dto("Car", dec!(10000000000)).validate().is_err());
        assert!(dto("Car", dec!(50000000000000000000000000000)).validate().is_err());
    }

    #[test]
    fn test_amount_precision_limited_to_cents() {
        assert!(dto("Lunch", dec!(12.345)).validate().is_err());
        assert!(dto("Lunch", dec!(12.340)).validate().is_ok());
    }

    #[test]
    fn test_blank_description_rejected_after_trim() {
        let result = dto("   ", dec!(10)).into_new();
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let new = dto("  Coffee ", dec!(10)).into_new().unwrap();
        assert_eq!(new.description, "Coffee");
    }

    #[test]
    fn test_request_uses_type_key() {
        let body = serde_json::json!({
            "date": "2024-03-05",
            "category_id": Uuid::nil(),
            "description": "Salary",
            "amount": 2000,
            "type": "revenue"
        });
        let parsed: TransactionDto = serde_json::from_value(body).unwrap();

        assert_eq!(parsed.transaction_type, TransactionType::Revenue);
        assert_eq!(parsed.amount, dec!(2000));
    }

    #[test]
    fn test_type_round_trips_through_str() {
        for t in [TransactionType::Expense, TransactionType::Revenue] {
            assert_eq!(TransactionType::parse(t.as_str()), Some(t));
        }
        assert_eq!(TransactionType::parse("income"), None);
    }
}
