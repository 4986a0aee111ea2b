//! Book (catalog entry) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Externally assigned identifier
    pub id: String,
    pub title: String,
    pub author: String,
    pub language_code: Option<String>,
    pub total_quantity: i32,
    /// Copies currently on the shelf (0 ..= total_quantity)
    pub available_quantity: i32,
    /// Number of times the book has been issued
    pub rented_count: i32,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub average_rating: Option<f64>,
    pub num_pages: Option<i32>,
    pub ratings_count: Option<i32>,
    pub text_reviews_count: Option<i32>,
    pub publisher: Option<String>,
    pub publication_date: Option<NaiveDate>,
}

impl Book {
    /// Number of copies currently issued to members
    pub fn issued_copies(&self) -> i32 {
        self.total_quantity - self.available_quantity
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookShort {
    pub id: String,
    pub title: String,
    pub author: String,
    pub total_quantity: i32,
    pub available_quantity: i32,
}

impl From<Book> for BookShort {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            total_quantity: book.total_quantity,
            available_quantity: book.available_quantity,
        }
    }
}

/// Create or replace book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 11, message = "Book ID must be 1 to 11 characters"))]
    pub id: String,
    #[validate(length(min = 2, max = 255, message = "Title must be 2 to 255 characters"))]
    pub title: String,
    #[validate(length(min = 2, max = 255, message = "Author must be 2 to 255 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 10, message = "Language code must be 1 to 10 characters"))]
    pub language_code: String,
    #[validate(range(min = 1, max = 100, message = "Total quantity must be between 1 and 100"))]
    pub total_quantity: i32,
    #[validate(length(equal = 10, message = "ISBN must be exactly 10 characters"))]
    pub isbn: String,
    #[validate(length(equal = 13, message = "ISBN13 must be exactly 13 characters"))]
    pub isbn13: String,
    #[validate(range(min = 0.0, max = 5.0, message = "Average rating must be between 0 and 5"))]
    pub average_rating: f64,
    #[validate(range(min = 1, message = "Number of pages must be at least 1"))]
    pub num_pages: i32,
    #[validate(range(min = 0, message = "Ratings count cannot be negative"))]
    pub ratings_count: i32,
    #[validate(range(min = 0, message = "Text reviews count cannot be negative"))]
    pub text_reviews_count: i32,
    #[validate(length(min = 2, max = 255, message = "Publisher must be 2 to 255 characters"))]
    pub publisher: String,
    pub publication_date: NaiveDate,
}

impl BookInput {
    /// Build the stored record for a brand-new book: every copy is on the shelf.
    pub fn into_new_book(self) -> Book {
        let total = self.total_quantity;
        self.into_book(total, 0)
    }

    /// Build the stored record keeping the given stock counters.
    pub fn into_book(self, available_quantity: i32, rented_count: i32) -> Book {
        Book {
            id: self.id,
            title: self.title,
            author: self.author,
            language_code: Some(self.language_code),
            total_quantity: self.total_quantity,
            available_quantity,
            rented_count,
            isbn: Some(self.isbn),
            isbn13: Some(self.isbn13),
            average_rating: Some(self.average_rating),
            num_pages: Some(self.num_pages),
            ratings_count: Some(self.ratings_count),
            text_reviews_count: Some(self.text_reviews_count),
            publisher: Some(self.publisher),
            publication_date: Some(self.publication_date),
        }
    }
}

/// Book search query parameters (substring match on title OR author)
#[derive(Debug, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookSearch {
    #[validate(length(max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 255))]
    pub author: Option<String>,
}

/// Import books request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ImportBooks {
    /// Number of books to import
    #[validate(range(min = 1, message = "Number of books must be at least 1"))]
    pub count: i32,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub author: Option<String>,
    /// Copies registered for each imported book (defaults to `count`)
    #[validate(range(min = 1, max = 100))]
    pub copies: Option<i32>,
}
