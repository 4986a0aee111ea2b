//! PostgreSQL catalog store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use super::{books, members, transactions, CatalogStore, UnitOfWork};
use crate::{
    config::DatabaseConfig,
    error::AppResult,
    models::{Book, Member, MemberInput, Transaction},
};

/// Catalog store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: Pool<Postgres>,
}

impl PgCatalogStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect to the configured database and apply pending migrations
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!("Database migrations completed");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Unit of work wrapping a database transaction; rolled back on drop
pub struct PgUnitOfWork {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn list_books(&mut self) -> AppResult<Vec<Book>> {
        books::list(&mut self.tx).await
    }

    async fn search_books(&mut self, title: Option<&str>, author: Option<&str>) -> AppResult<Vec<Book>> {
        books::search(&mut self.tx, title, author).await
    }

    async fn find_book(&mut self, id: &str) -> AppResult<Option<Book>> {
        books::find(&mut self.tx, id).await
    }

    async fn insert_book(&mut self, book: &Book) -> AppResult<()> {
        books::insert(&mut self.tx, book).await
    }

    async fn replace_book(&mut self, current_id: &str, book: &Book) -> AppResult<()> {
        books::replace(&mut self.tx, current_id, book).await
    }

    async fn delete_book(&mut self, id: &str) -> AppResult<()> {
        books::delete(&mut self.tx, id).await
    }

    async fn take_copy(&mut self, book_id: &str) -> AppResult<bool> {
        books::take_copy(&mut self.tx, book_id).await
    }

    async fn restore_copy(&mut self, book_id: &str) -> AppResult<bool> {
        books::restore_copy(&mut self.tx, book_id).await
    }

    async fn count_book_transactions(&mut self, book_id: &str) -> AppResult<i64> {
        books::count_transactions(&mut self.tx, book_id).await
    }

    async fn list_members(&mut self) -> AppResult<Vec<Member>> {
        members::list(&mut self.tx).await
    }

    async fn find_member(&mut self, id: i32) -> AppResult<Option<Member>> {
        members::find_for_update(&mut self.tx, id).await
    }

    async fn insert_member(&mut self, input: &MemberInput) -> AppResult<Member> {
        members::insert(&mut self.tx, input).await
    }

    async fn update_member_contact(&mut self, id: i32, input: &MemberInput) -> AppResult<bool> {
        members::update_contact(&mut self.tx, id, input).await
    }

    async fn update_member_balance(
        &mut self,
        id: i32,
        outstanding_debt: Decimal,
        amount_spent: Decimal,
    ) -> AppResult<()> {
        members::update_balance(&mut self.tx, id, outstanding_debt, amount_spent).await
    }

    async fn delete_member(&mut self, id: i32) -> AppResult<()> {
        members::delete(&mut self.tx, id).await
    }

    async fn count_member_transactions(&mut self, member_id: i32) -> AppResult<i64> {
        members::count_transactions(&mut self.tx, member_id).await
    }

    async fn list_transactions(&mut self) -> AppResult<Vec<Transaction>> {
        transactions::list(&mut self.tx).await
    }

    async fn find_transaction(&mut self, id: i32) -> AppResult<Option<Transaction>> {
        transactions::find_for_update(&mut self.tx, id).await
    }

    async fn insert_transaction(
        &mut self,
        book_id: &str,
        member_id: i32,
        per_day_fee: Decimal,
        borrowed_on: DateTime<Utc>,
    ) -> AppResult<Transaction> {
        transactions::insert(&mut self.tx, book_id, member_id, per_day_fee, borrowed_on).await
    }

    async fn settle_transaction(
        &mut self,
        id: i32,
        returned_on: DateTime<Utc>,
        total_charge: Decimal,
        amount_paid: Decimal,
    ) -> AppResult<bool> {
        transactions::settle(&mut self.tx, id, returned_on, total_charge, amount_paid).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
