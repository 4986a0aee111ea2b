//! Repository layer: the catalog store and its units of work

pub mod books;
pub mod memory;
pub mod members;
pub mod postgres;
pub mod transactions;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{Book, Member, MemberInput, Transaction},
};

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Handle to persisted books, members and transactions.
///
/// Every read or write goes through a [`UnitOfWork`] obtained with
/// [`CatalogStore::begin`].
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Open a new unit of work.
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// Check the store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// Atomic scope over the catalog.
///
/// Changes become visible only after [`UnitOfWork::commit`]; dropping the
/// unit of work without committing discards all of them.
#[async_trait]
pub trait UnitOfWork: Send {
    // Books

    async fn list_books(&mut self) -> AppResult<Vec<Book>>;

    /// Case-insensitive substring match on title OR author.
    async fn search_books(&mut self, title: Option<&str>, author: Option<&str>) -> AppResult<Vec<Book>>;

    async fn find_book(&mut self, id: &str) -> AppResult<Option<Book>>;

    async fn insert_book(&mut self, book: &Book) -> AppResult<()>;

    /// Overwrite the book stored under `current_id`; `book.id` may differ, in
    /// which case transactions follow the new identifier.
    async fn replace_book(&mut self, current_id: &str, book: &Book) -> AppResult<()>;

    async fn delete_book(&mut self, id: &str) -> AppResult<()>;

    /// Take one copy off the shelf: available -1, rented +1.
    /// Returns false when no copy is available; nothing changes then.
    async fn take_copy(&mut self, book_id: &str) -> AppResult<bool>;

    /// Put one copy back on the shelf. Returns false if the book is missing
    /// or already fully stocked.
    async fn restore_copy(&mut self, book_id: &str) -> AppResult<bool>;

    async fn count_book_transactions(&mut self, book_id: &str) -> AppResult<i64>;

    // Members

    async fn list_members(&mut self) -> AppResult<Vec<Member>>;

    /// The row stays locked until the unit of work ends.
    async fn find_member(&mut self, id: i32) -> AppResult<Option<Member>>;

    async fn insert_member(&mut self, input: &MemberInput) -> AppResult<Member>;

    /// Update name, email and phone. Returns false if the member is missing.
    async fn update_member_contact(&mut self, id: i32, input: &MemberInput) -> AppResult<bool>;

    async fn update_member_balance(
        &mut self,
        id: i32,
        outstanding_debt: Decimal,
        amount_spent: Decimal,
    ) -> AppResult<()>;

    async fn delete_member(&mut self, id: i32) -> AppResult<()>;

    async fn count_member_transactions(&mut self, member_id: i32) -> AppResult<i64>;

    // Transactions

    async fn list_transactions(&mut self) -> AppResult<Vec<Transaction>>;

    /// The row stays locked until the unit of work ends.
    async fn find_transaction(&mut self, id: i32) -> AppResult<Option<Transaction>>;

    async fn insert_transaction(
        &mut self,
        book_id: &str,
        member_id: i32,
        per_day_fee: Decimal,
        borrowed_on: DateTime<Utc>,
    ) -> AppResult<Transaction>;

    /// Close an open transaction. Returns false if it was already closed.
    async fn settle_transaction(
        &mut self,
        id: i32,
        returned_on: DateTime<Utc>,
        total_charge: Decimal,
        amount_paid: Decimal,
    ) -> AppResult<bool>;

    /// Publish every change made in this unit of work.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    async fn get_book(&mut self, id: &str) -> AppResult<Book> {
        self.find_book(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    async fn get_member(&mut self, id: i32) -> AppResult<Member> {
        self.find_member(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    async fn get_transaction(&mut self, id: i32) -> AppResult<Transaction> {
        self.find_transaction(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction with id {} not found", id)))
    }
}
