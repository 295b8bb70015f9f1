use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{check_category, CategoryStore, Store, TransactionStore, UserStore};
use crate::analytics::filter::TransactionFilter;
use crate::auth::models::{NewUser, User};
use crate::category::models::{Category, NewCategory};
use crate::errors::AppError;
use crate::transaction::models::{NewTransaction, Transaction, TransactionType};

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    category_type: String,
    icon: String,
}

impl TryFrom<CategoryRow> for Category {
    type Error = AppError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: row.id,
            name: row.name,
            category_type: parse_type(&row.category_type)?,
            icon: row.icon,
        })
    }
}

#[derive(Debug, FromRow)]
struct TransactionRow {
    id: Uuid,
    owner_id: Uuid,
    date: NaiveDate,
    category_id: Uuid,
    description: String,
    amount: Decimal,
    transaction_type: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = AppError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: row.id,
            owner_id: row.owner_id,
            date: row.date,
            category_id: row.category_id,
            description: row.description,
            amount: row.amount,
            transaction_type: parse_type(&row.transaction_type)?,
            created_at: row.created_at,
        })
    }
}

fn parse_type(s: &str) -> Result<TransactionType, AppError> {
    TransactionType::parse(s)
        .ok_or_else(|| AppError::InternalError(format!("Unknown transaction type in store: {s}")))
}

const TRANSACTION_COLUMNS: &str =
    "id, owner_id, date, category_id, description, amount, transaction_type, created_at";

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with production pool settings.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(3))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Migration failed: {e}")))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Lock the transaction row and check it belongs to `owner_id`.
    async fn lock_owned(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError> {
        let row_owner = sqlx::query_scalar::<_, Uuid>(
            "SELECT owner_id FROM transactions WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

        if row_owner != owner_id {
            return Err(AppError::Forbidden(
                "Transaction belongs to another user".to_string(),
            ));
        }
        Ok(())
    }

    /// Lock the category row for the rest of the database transaction and
    /// check it accepts `transaction_type`.
    async fn lock_category(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        category_id: Uuid,
        transaction_type: TransactionType,
    ) -> Result<(), AppError> {
        let category = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, category_type, icon FROM categories WHERE id = $1 FOR SHARE",
        )
        .bind(category_id)
        .fetch_optional(&mut **tx)
        .await?
        .map(Category::try_from)
        .transpose()?;

        check_category(category.as_ref(), transaction_type)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let taken = sqlx::query_as::<_, (String, String)>(
            "SELECT username, email FROM users WHERE username = $1 OR email = $2 LIMIT 1",
        )
        .bind(&user.username)
        .bind(&user.email)
        .fetch_optional(&self.pool)
        .await?;

        if let Some((username, _)) = taken {
            let message = if username == user.username {
                "Username already exists"
            } else {
                "Email already exists"
            };
            return Err(AppError::Conflict(message.to_string()));
        }

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, age, occupation,
                               family_situation, monthly_spending_threshold, financial_goal)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, username, email, password_hash, age, occupation, family_situation,
                      monthly_spending_threshold, financial_goal, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.age)
        .bind(&user.occupation)
        .bind(&user.family_situation)
        .bind(user.monthly_spending_threshold)
        .bind(&user.financial_goal)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, age, occupation, family_situation,
                   monthly_spending_threshold, financial_goal, created_at
            FROM users WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, age, occupation, family_situation,
                   monthly_spending_threshold, financial_goal, created_at
            FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn list_categories(
        &self,
        category_type: Option<TransactionType>,
    ) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, category_type, icon
            FROM categories
            WHERE ($1::text IS NULL OR category_type = $1)
            ORDER BY category_type ASC, name ASC
            "#,
        )
        .bind(category_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Category::try_from)
        .collect()
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, category_type, icon FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Category::try_from)
        .transpose()
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1 AND category_type = $2)",
        )
        .bind(&category.name)
        .bind(category.category_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        if exists {
            return Err(AppError::Conflict(format!(
                "A {} category named '{}' already exists",
                category.category_type.as_str(),
                category.name
            )));
        }

        sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (id, name, category_type, icon)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, category_type, icon
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&category.name)
        .bind(category.category_type.as_str())
        .bind(&category.icon)
        .fetch_one(&self.pool)
        .await?
        .try_into()
    }

    async fn count_categories(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn query(
        &self,
        owner_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        // Same conditions as TransactionFilter::matches; both date bounds inclusive
        let sql = format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE owner_id = $1
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
              AND ($4::uuid IS NULL OR category_id = $4)
              AND ($5::text IS NULL OR transaction_type = $5)
            ORDER BY date DESC, created_at DESC, id ASC
            "#
        );

        sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(owner_id)
            .bind(filter.start_date())
            .bind(filter.end_date())
            .bind(filter.category_id)
            .bind(filter.transaction_type.map(|t| t.as_str()))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    async fn insert(
        &self,
        owner_id: Uuid,
        transaction: NewTransaction,
    ) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        Self::lock_category(&mut tx, transaction.category_id, transaction.transaction_type)
            .await?;

        let sql = format!(
            r#"
            INSERT INTO transactions
                (id, owner_id, date, category_id, description, amount, transaction_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner_id)
            .bind(transaction.date)
            .bind(transaction.category_id)
            .bind(&transaction.description)
            .bind(transaction.amount)
            .bind(transaction.transaction_type.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        row.try_into()
    }

    async fn replace(
        &self,
        owner_id: Uuid,
        id: Uuid,
        transaction: NewTransaction,
    ) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        Self::lock_owned(&mut tx, owner_id, id).await?;
        Self::lock_category(&mut tx, transaction.category_id, transaction.transaction_type)
            .await?;

        let sql = format!(
            r#"
            UPDATE transactions SET
                date = $2,
                category_id = $3,
                description = $4,
                amount = $5,
                transaction_type = $6
            WHERE id = $1
            RETURNING {TRANSACTION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, TransactionRow>(&sql)
            .bind(id)
            .bind(transaction.date)
            .bind(transaction.category_id)
            .bind(&transaction.description)
            .bind(transaction.amount)
            .bind(transaction.transaction_type.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        row.try_into()
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        Self::lock_owned(&mut tx, owner_id, id).await?;

        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
