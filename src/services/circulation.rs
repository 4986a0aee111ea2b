//! Lending service: issuing books, returning them, and the ledger

use std::sync::Arc;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    models::{IssueBook, ReturnBook, ReturnQuote, ReturnReceipt, Transaction},
    repository::CatalogStore,
    settlement,
};

#[derive(Clone)]
pub struct CirculationService {
    store: Arc<dyn CatalogStore>,
    clock: Arc<dyn Clock>,
}

impl CirculationService {
    pub fn new(store: Arc<dyn CatalogStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn list_transactions(&self) -> AppResult<Vec<Transaction>> {
        let mut uow = self.store.begin().await?;
        uow.list_transactions().await
    }

    pub async fn get_transaction(&self, id: i32) -> AppResult<Transaction> {
        let mut uow = self.store.begin().await?;
        uow.get_transaction(id).await
    }

    /// Lend a copy of a book to a member
    pub async fn issue_book(&self, request: IssueBook) -> AppResult<Transaction> {
        settlement::check_per_day_fee(request.per_day_fee)?;

        let mut uow = self.store.begin().await?;
        uow.get_book(&request.book_id).await?;
        uow.get_member(request.member_id).await?;

        if !uow.take_copy(&request.book_id).await? {
            return Err(AppError::Validation(
                "No copies of this book are available to be rented".to_string(),
            ));
        }
        let transaction = uow
            .insert_transaction(
                &request.book_id,
                request.member_id,
                request.per_day_fee,
                self.clock.now(),
            )
            .await?;
        uow.commit().await?;

        tracing::info!(
            "Book issued: transaction={} book={} member={}",
            transaction.id, transaction.book_id, transaction.member_id
        );
        Ok(transaction)
    }

    /// Charge owed if the book came back now
    pub async fn quote_return(&self, transaction_id: i32) -> AppResult<ReturnQuote> {
        let mut uow = self.store.begin().await?;
        let transaction = uow.get_transaction(transaction_id).await?;
        let member = uow.get_member(transaction.member_id).await?;
        settlement::quote(&transaction, &member, self.clock.now())
    }

    /// Settle an open transaction
    pub async fn return_book(&self, transaction_id: i32, request: ReturnBook) -> AppResult<ReturnReceipt> {
        settlement::check_amount_paid(request.amount_paid)?;

        let mut uow = self.store.begin().await?;
        let receipt =
            settlement::settle(uow.as_mut(), transaction_id, request.amount_paid, self.clock.now())
                .await?;
        uow.commit().await?;

        tracing::info!(
            "Book returned: transaction={} days={} charge={} paid={} member_debt={}",
            transaction_id,
            receipt.days,
            receipt.transaction.total_charge.unwrap_or_default(),
            request.amount_paid,
            receipt.member.outstanding_debt()
        );
        Ok(receipt)
    }
}
