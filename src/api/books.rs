//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Book, BookInput, BookSearch, BookShort, ImportBooks, ImportReport},
    AppState,
};

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<BookShort>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookShort>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books.into_iter().map(BookShort::from).collect()))
}

/// Search books by title or author
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(BookSearch),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "No search term given")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<BookSearch>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.search_books(&query).await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(&id).await?;
    Ok(Json(book))
}

/// Add a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Book ID already exists")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(input): Json<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.catalog.create_book(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace a book's details
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Current book ID")
    ),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "New book ID already exists")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<BookInput>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.update_book(&id, input).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book has transactions")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Import books from the remote catalog
#[utoipa::path(
    post,
    path = "/books/import",
    tag = "books",
    request_body = ImportBooks,
    responses(
        (status = 200, description = "Import summary", body = ImportReport),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Remote catalog unavailable")
    )
)]
pub async fn import_books(
    State(state): State<AppState>,
    Json(request): Json<ImportBooks>,
) -> AppResult<Json<ImportReport>> {
    let report = state.services.import.import_books(request).await?;
    Ok(Json(report))
}
