use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{check_category, CategoryStore, Store, TransactionStore, UserStore};
use crate::analytics::aggregate::newest_first;
use crate::analytics::filter::TransactionFilter;
use crate::auth::models::{NewUser, User};
use crate::category::models::{Category, NewCategory};
use crate::errors::AppError;
use crate::transaction::models::{NewTransaction, Transaction, TransactionType};

/// Process-local store. Used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    transactions: HashMap<Uuid, Transaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State {
    /// Look up a transaction id and check it belongs to `owner_id`.
    fn owned_transaction(&self, owner_id: Uuid, id: Uuid) -> Result<&Transaction, AppError> {
        let existing = self
            .transactions
            .get(&id)
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

        if existing.owner_id != owner_id {
            return Err(AppError::Forbidden(
                "Transaction belongs to another user".to_string(),
            ));
        }
        Ok(existing)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            age: user.age,
            occupation: user.occupation,
            family_situation: user.family_situation,
            monthly_spending_threshold: user.monthly_spending_threshold,
            financial_goal: user.financial_goal,
            created_at: Utc::now(),
        };
        state.users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(
        &self,
        category_type: Option<TransactionType>,
    ) -> Result<Vec<Category>, AppError> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state
            .categories
            .values()
            .filter(|c| category_type.map_or(true, |kind| c.category_type == kind))
            .cloned()
            .collect();

        categories.sort_by(|a, b| {
            a.category_type
                .as_str()
                .cmp(b.category_type.as_str())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, AppError> {
        let mut state = self.state.write().await;

        let duplicate = state
            .categories
            .values()
            .any(|c| c.name == category.name && c.category_type == category.category_type);
        if duplicate {
            return Err(AppError::Conflict(format!(
                "A {} category named '{}' already exists",
                category.category_type.as_str(),
                category.name
            )));
        }

        let created = Category {
            id: Uuid::new_v4(),
            name: category.name,
            category_type: category.category_type,
            icon: category.icon,
        };
        state.categories.insert(created.id, created.clone());

        Ok(created)
    }

    async fn count_categories(&self) -> Result<i64, AppError> {
        Ok(self.state.read().await.categories.len() as i64)
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn query(
        &self,
        owner_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        let state = self.state.read().await;
        let mut transactions: Vec<Transaction> = state
            .transactions
            .values()
            .filter(|t| t.owner_id == owner_id && filter.matches(t))
            .cloned()
            .collect();

        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    async fn insert(
        &self,
        owner_id: Uuid,
        transaction: NewTransaction,
    ) -> Result<Transaction, AppError> {
        let mut state = self.state.write().await;
        check_category(
            state.categories.get(&transaction.category_id),
            transaction.transaction_type,
        )?;

        let created = Transaction {
            id: Uuid::new_v4(),
            owner_id,
            date: transaction.date,
            category_id: transaction.category_id,
            description: transaction.description,
            amount: transaction.amount,
            transaction_type: transaction.transaction_type,
            created_at: Utc::now(),
        };
        state.transactions.insert(created.id, created.clone());

        Ok(created)
    }

    async fn replace(
        &self,
        owner_id: Uuid,
        id: Uuid,
        transaction: NewTransaction,
    ) -> Result<Transaction, AppError> {
        let mut state = self.state.write().await;
        let created_at = state.owned_transaction(owner_id, id)?.created_at;
        check_category(
            state.categories.get(&transaction.category_id),
            transaction.transaction_type,
        )?;

        let replaced = Transaction {
            id,
            owner_id,
            date: transaction.date,
            category_id: transaction.category_id,
            description: transaction.description,
            amount: transaction.amount,
            transaction_type: transaction.transaction_type,
            created_at,
        };
        state.transactions.insert(id, replaced.clone());

        Ok(replaced)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.owned_transaction(owner_id, id)?;
        state.transactions.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    async fn store_with_categories() -> (MemoryStore, Category, Category) {
        let store = MemoryStore::new();
        let food = store
            .create_category(NewCategory {
                name: "Food".to_string(),
                category_type: TransactionType::Expense,
                icon: String::new(),
            })
            .await
            .unwrap();
        let salary = store
            .create_category(NewCategory {
                name: "Salary".to_string(),
                category_type: TransactionType::Revenue,
                icon: String::new(),
            })
            .await
            .unwrap();
        (store, food, salary)
    }

    fn new_transaction(category: &Category, kind: TransactionType) -> NewTransaction {
        NewTransaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            category_id: category.id,
            description: "Lunch".to_string(),
            amount: dec!(12.50),
            transaction_type: kind,
        }
    }

    #[tokio::test]
    async fn test_mismatched_category_not_persisted() {
        let (store, food, _) = store_with_categories().await;
        let owner = Uuid::new_v4();

        let result = store
            .insert(owner, new_transaction(&food, TransactionType::Revenue))
            .await;

        assert!(matches!(result, Err(AppError::InvalidCategory(_))));
        let all = store
            .query(owner, &TransactionFilter::default())
            .await
            .unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_category_is_invalid() {
        let (store, _, _) = store_with_categories().await;
        let ghost = Category {
            id: Uuid::new_v4(),
            name: "Ghost".to_string(),
            category_type: TransactionType::Expense,
            icon: String::new(),
        };

        let result = store
            .insert(Uuid::new_v4(), new_transaction(&ghost, TransactionType::Expense))
            .await;
        assert!(matches!(result, Err(AppError::InvalidCategory(_))));
    }

    #[tokio::test]
    async fn test_query_is_scoped_to_owner() {
        let (store, food, _) = store_with_categories().await;
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store
            .insert(alice, new_transaction(&food, TransactionType::Expense))
            .await
            .unwrap();

        let for_bob = store.query(bob, &TransactionFilter::default()).await.unwrap();
        assert!(for_bob.is_empty());
        let for_alice = store
            .query(alice, &TransactionFilter::default())
            .await
            .unwrap();
        assert_eq!(for_alice.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_and_delete_distinguish_forbidden_from_missing() {
        let (store, food, _) = store_with_categories().await;
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let created = store
            .insert(alice, new_transaction(&food, TransactionType::Expense))
            .await
            .unwrap();

        let forbidden = store
            .replace(bob, created.id, new_transaction(&food, TransactionType::Expense))
            .await;
        assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

        let missing = store.delete(alice, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let forbidden = store.delete(bob, created.id).await;
        assert!(matches!(forbidden, Err(AppError::Forbidden(_))));
        assert!(store.delete(alice, created.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_replace_keeps_identity_and_creation_time() {
        let (store, food, salary) = store_with_categories().await;
        let owner = Uuid::new_v4();
        let created = store
            .insert(owner, new_transaction(&food, TransactionType::Expense))
            .await
            .unwrap();

        let replaced = store
            .replace(
                owner,
                created.id,
                new_transaction(&salary, TransactionType::Revenue),
            )
            .await
            .unwrap();

        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.created_at, created.created_at);
        assert_eq!(replaced.transaction_type, TransactionType::Revenue);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        let user = NewUser {
            username: "demo".to_string(),
            email: "demo@example.com".to_string(),
            password_hash: "hash".to_string(),
            age: None,
            occupation: None,
            family_situation: None,
            monthly_spending_threshold: None,
            financial_goal: None,
        };

        store.create_user(user.clone()).await.unwrap();
        let again = store.create_user(user).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }
}
