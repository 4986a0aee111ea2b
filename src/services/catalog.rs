//! Catalog (book) management service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInput, BookSearch},
    repository::CatalogStore,
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let mut uow = self.store.begin().await?;
        uow.list_books().await
    }

    /// Substring search on title OR author; at least one term is required
    pub async fn search_books(&self, query: &BookSearch) -> AppResult<Vec<Book>> {
        query.validate()?;
        let title = query.title.as_deref().filter(|t| !t.is_empty());
        let author = query.author.as_deref().filter(|a| !a.is_empty());
        if title.is_none() && author.is_none() {
            return Err(AppError::Validation(
                "A title or an author is required to search".to_string(),
            ));
        }

        let mut uow = self.store.begin().await?;
        uow.search_books(title, author).await
    }

    pub async fn get_book(&self, id: &str) -> AppResult<Book> {
        let mut uow = self.store.begin().await?;
        uow.get_book(id).await
    }

    /// Add a book with every copy on the shelf
    pub async fn create_book(&self, input: BookInput) -> AppResult<Book> {
        input.validate()?;

        let mut uow = self.store.begin().await?;
        if uow.find_book(&input.id).await?.is_some() {
            return Err(AppError::State(format!("Book with id {} already exists", input.id)));
        }

        let book = input.into_new_book();
        uow.insert_book(&book).await?;
        uow.commit().await?;

        tracing::info!("Book added: id={} copies={}", book.id, book.total_quantity);
        Ok(book)
    }

    /// Replace a book's details. Copies currently issued stay issued: the
    /// shelf count moves by the same amount as the total.
    pub async fn update_book(&self, id: &str, input: BookInput) -> AppResult<Book> {
        input.validate()?;

        let mut uow = self.store.begin().await?;
        let current = uow.get_book(id).await?;

        if input.id != current.id && uow.find_book(&input.id).await?.is_some() {
            return Err(AppError::State(format!("Book with id {} already exists", input.id)));
        }

        let available = current.available_quantity + (input.total_quantity - current.total_quantity);
        if available < 0 {
            return Err(AppError::Validation(format!(
                "Total quantity cannot be lower than the {} copies currently issued",
                current.issued_copies()
            )));
        }

        let book = input.into_book(available, current.rented_count);
        uow.replace_book(&current.id, &book).await?;
        uow.commit().await?;

        if book.id != current.id {
            tracing::info!("Book {} renamed to {}", current.id, book.id);
        }
        tracing::info!(
            "Book updated: id={} total={} available={}",
            book.id, book.total_quantity, book.available_quantity
        );
        Ok(book)
    }

    /// Delete a book that has never been lent out
    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        let mut uow = self.store.begin().await?;
        uow.get_book(id).await?;

        let references = uow.count_book_transactions(id).await?;
        if references > 0 {
            return Err(AppError::State(format!(
                "Book {} is referenced by {} transaction(s)",
                id, references
            )));
        }

        uow.delete_book(id).await?;
        uow.commit().await?;

        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }
}
