//! Lending endpoints: issue, return and the transaction ledger

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{IssueBook, ReturnBook, ReturnQuote, ReturnReceipt, Transaction},
    AppState,
};

/// List all transactions, newest first
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    responses(
        (status = 200, description = "All transactions", body = Vec<Transaction>)
    )
)]
pub async fn list_transactions(State(state): State<AppState>) -> AppResult<Json<Vec<Transaction>>> {
    let transactions = state.services.circulation.list_transactions().await?;
    Ok(Json(transactions))
}

/// Get a transaction
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "transactions",
    params(
        ("id" = i32, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction", body = Transaction),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Transaction>> {
    let transaction = state.services.circulation.get_transaction(id).await?;
    Ok(Json(transaction))
}

/// Issue a book to a member
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    request_body = IssueBook,
    responses(
        (status = 201, description = "Book issued", body = Transaction),
        (status = 400, description = "Invalid fee or no copy available"),
        (status = 404, description = "Book or member not found")
    )
)]
pub async fn issue_book(
    State(state): State<AppState>,
    Json(request): Json<IssueBook>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let transaction = state.services.circulation.issue_book(request).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Charge due if the book is returned now
#[utoipa::path(
    get,
    path = "/transactions/{id}/return",
    tag = "transactions",
    params(
        ("id" = i32, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Return quote", body = ReturnQuote),
        (status = 404, description = "Transaction not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn quote_return(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ReturnQuote>> {
    let quote = state.services.circulation.quote_return(id).await?;
    Ok(Json(quote))
}

/// Return a book and settle its fee
#[utoipa::path(
    post,
    path = "/transactions/{id}/return",
    tag = "transactions",
    params(
        ("id" = i32, Path, description = "Transaction ID")
    ),
    request_body = ReturnBook,
    responses(
        (status = 200, description = "Book returned", body = ReturnReceipt),
        (status = 400, description = "Negative payment or debt ceiling reached"),
        (status = 404, description = "Transaction not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ReturnBook>,
) -> AppResult<Json<ReturnReceipt>> {
    let receipt = state.services.circulation.return_book(id, request).await?;
    Ok(Json(receipt))
}
