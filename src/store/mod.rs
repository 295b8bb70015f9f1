//! Storage seam. Services talk to these traits only; the binary picks the
//! PostgreSQL adapter when a database is configured and the in-memory one
//! otherwise.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::analytics::filter::TransactionFilter;
use crate::auth::models::{NewUser, User};
use crate::category::models::{Category, NewCategory};
use crate::errors::AppError;
use crate::transaction::models::{NewTransaction, Transaction, TransactionType};

#[async_trait]
pub trait UserStore {
    /// Fails with `Conflict` when the username or email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait CategoryStore {
    /// Categories ordered by type, then name.
    async fn list_categories(
        &self,
        category_type: Option<TransactionType>,
    ) -> Result<Vec<Category>, AppError>;

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError>;

    /// Fails with `Conflict` when a category with the same name and type exists.
    async fn create_category(&self, category: NewCategory) -> Result<Category, AppError>;

    async fn count_categories(&self) -> Result<i64, AppError>;
}

/// Durable, owner-scoped transaction storage.
#[async_trait]
pub trait TransactionStore {
    /// The owner's transactions satisfying `filter`, newest first.
    async fn query(
        &self,
        owner_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError>;

    /// Fails with `InvalidCategory` unless the category exists and has the
    /// transaction's type. Nothing is persisted on failure.
    async fn insert(
        &self,
        owner_id: Uuid,
        transaction: NewTransaction,
    ) -> Result<Transaction, AppError>;

    /// Full replace; last write wins. `NotFound` for an unknown id,
    /// `Forbidden` for another owner's transaction, `InvalidCategory` as for
    /// [`TransactionStore::insert`].
    async fn replace(
        &self,
        owner_id: Uuid,
        id: Uuid,
        transaction: NewTransaction,
    ) -> Result<Transaction, AppError>;

    /// `NotFound` for an unknown id, `Forbidden` for another owner's transaction.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait Store: UserStore + CategoryStore + TransactionStore + Send + Sync {
    /// Cheap connectivity check for the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}

pub(crate) fn check_category(
    category: Option<&Category>,
    transaction_type: TransactionType,
) -> Result<(), AppError> {
    match category {
        None => Err(AppError::InvalidCategory(
            "Category does not exist".to_string(),
        )),
        Some(c) if c.category_type != transaction_type => Err(AppError::InvalidCategory(format!(
            "Category '{}' is for {} transactions, not {}",
            c.name,
            c.category_type.as_str(),
            transaction_type.as_str()
        ))),
        Some(_) => Ok(()),
    }
}
