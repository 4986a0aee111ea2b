//! In-memory catalog store
//!
//! A unit of work holds the store lock for its whole lifetime and edits a
//! staged copy of the catalog, published on commit. Used by tests.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{CatalogStore, UnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::{Book, Member, MemberInput, Transaction},
};

#[derive(Debug, Clone, Default)]
struct CatalogState {
    books: BTreeMap<String, Book>,
    members: BTreeMap<i32, Member>,
    transactions: BTreeMap<i32, Transaction>,
    last_member_id: i32,
    last_transaction_id: i32,
}

#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    state: Arc<Mutex<CatalogState>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, staged }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<CatalogState>,
    staged: CatalogState,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn sorted_books<'a>(books: impl Iterator<Item = &'a Book>) -> Vec<Book> {
    let mut books: Vec<Book> = books.cloned().collect();
    books.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
    books
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn list_books(&mut self) -> AppResult<Vec<Book>> {
        Ok(sorted_books(self.staged.books.values()))
    }

    async fn search_books(&mut self, title: Option<&str>, author: Option<&str>) -> AppResult<Vec<Book>> {
        Ok(sorted_books(self.staged.books.values().filter(|book| {
            title.is_some_and(|t| contains_ignore_case(&book.title, t))
                || author.is_some_and(|a| contains_ignore_case(&book.author, a))
        })))
    }

    async fn find_book(&mut self, id: &str) -> AppResult<Option<Book>> {
        Ok(self.staged.books.get(id).cloned())
    }

    async fn insert_book(&mut self, book: &Book) -> AppResult<()> {
        if self.staged.books.contains_key(&book.id) {
            return Err(AppError::State(format!("Book with id {} already exists", book.id)));
        }
        self.staged.books.insert(book.id.clone(), book.clone());
        Ok(())
    }

    async fn replace_book(&mut self, current_id: &str, book: &Book) -> AppResult<()> {
        if self.staged.books.remove(current_id).is_none() {
            return Ok(());
        }
        if current_id != book.id {
            for transaction in self.staged.transactions.values_mut() {
                if transaction.book_id == current_id {
                    transaction.book_id = book.id.clone();
                }
            }
        }
        self.staged.books.insert(book.id.clone(), book.clone());
        Ok(())
    }

    async fn delete_book(&mut self, id: &str) -> AppResult<()> {
        self.staged.books.remove(id);
        Ok(())
    }

    async fn take_copy(&mut self, book_id: &str) -> AppResult<bool> {
        match self.staged.books.get_mut(book_id) {
            Some(book) if book.available_quantity > 0 => {
                book.available_quantity -= 1;
                book.rented_count += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restore_copy(&mut self, book_id: &str) -> AppResult<bool> {
        match self.staged.books.get_mut(book_id) {
            Some(book) if book.available_quantity < book.total_quantity => {
                book.available_quantity += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_book_transactions(&mut self, book_id: &str) -> AppResult<i64> {
        Ok(self
            .staged
            .transactions
            .values()
            .filter(|t| t.book_id == book_id)
            .count() as i64)
    }

    async fn list_members(&mut self) -> AppResult<Vec<Member>> {
        Ok(self.staged.members.values().cloned().collect())
    }

    async fn find_member(&mut self, id: i32) -> AppResult<Option<Member>> {
        Ok(self.staged.members.get(&id).cloned())
    }

    async fn insert_member(&mut self, input: &MemberInput) -> AppResult<Member> {
        self.staged.last_member_id += 1;
        let member = Member {
            id: self.staged.last_member_id,
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            outstanding_debt: Some(Decimal::ZERO),
            amount_spent: Some(Decimal::ZERO),
        };
        self.staged.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn update_member_contact(&mut self, id: i32, input: &MemberInput) -> AppResult<bool> {
        match self.staged.members.get_mut(&id) {
            Some(member) => {
                member.name = input.name.clone();
                member.email = input.email.clone();
                member.phone = input.phone.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_member_balance(
        &mut self,
        id: i32,
        outstanding_debt: Decimal,
        amount_spent: Decimal,
    ) -> AppResult<()> {
        if let Some(member) = self.staged.members.get_mut(&id) {
            member.outstanding_debt = Some(outstanding_debt);
            member.amount_spent = Some(amount_spent);
        }
        Ok(())
    }

    async fn delete_member(&mut self, id: i32) -> AppResult<()> {
        self.staged.members.remove(&id);
        Ok(())
    }

    async fn count_member_transactions(&mut self, member_id: i32) -> AppResult<i64> {
        Ok(self
            .staged
            .transactions
            .values()
            .filter(|t| t.member_id == member_id)
            .count() as i64)
    }

    async fn list_transactions(&mut self) -> AppResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self.staged.transactions.values().cloned().collect();
        transactions.sort_by(|a, b| b.borrowed_on.cmp(&a.borrowed_on).then_with(|| b.id.cmp(&a.id)));
        Ok(transactions)
    }

    async fn find_transaction(&mut self, id: i32) -> AppResult<Option<Transaction>> {
        Ok(self.staged.transactions.get(&id).cloned())
    }

    async fn insert_transaction(
        &mut self,
        book_id: &str,
        member_id: i32,
        per_day_fee: Decimal,
        borrowed_on: DateTime<Utc>,
    ) -> AppResult<Transaction> {
        if !self.staged.books.contains_key(book_id) {
            return Err(AppError::NotFound(format!("Book with id {} not found", book_id)));
        }
        if !self.staged.members.contains_key(&member_id) {
            return Err(AppError::NotFound(format!("Member with id {} not found", member_id)));
        }
        self.staged.last_transaction_id += 1;
        let transaction = Transaction {
            id: self.staged.last_transaction_id,
            book_id: book_id.to_string(),
            member_id,
            per_day_fee,
            borrowed_on,
            returned_on: None,
            total_charge: None,
            amount_paid: None,
        };
        self.staged.transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn settle_transaction(
        &mut self,
        id: i32,
        returned_on: DateTime<Utc>,
        total_charge: Decimal,
        amount_paid: Decimal,
    ) -> AppResult<bool> {
        match self.staged.transactions.get_mut(&id) {
            Some(transaction) if transaction.is_open() => {
                transaction.returned_on = Some(returned_on);
                transaction.total_charge = Some(total_charge);
                transaction.amount_paid = Some(amount_paid);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryUnitOfWork { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_input() -> MemberInput {
        MemberInput {
            name: "Grace Hopper".to_string(),
            email: "grace@example.org".to_string(),
            phone: "0123456789".to_string(),
        }
    }

    #[tokio::test]
    async fn dropped_unit_of_work_leaves_no_trace() {
        let store = MemoryCatalogStore::new();

        let mut uow = store.begin().await.unwrap();
        uow.insert_member(&member_input()).await.unwrap();
        drop(uow);

        let mut uow = store.begin().await.unwrap();
        assert!(uow.list_members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn committed_changes_are_visible_to_later_units() {
        let store = MemoryCatalogStore::new();

        let mut uow = store.begin().await.unwrap();
        let member = uow.insert_member(&member_input()).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.get_member(member.id).await.unwrap(), member);
        assert!(matches!(uow.get_member(member.id + 1).await, Err(AppError::NotFound(_))));
    }
}
