//! Lending transaction queries for PostgreSQL

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::{error::AppResult, models::Transaction};

pub async fn list(conn: &mut PgConnection) -> AppResult<Vec<Transaction>> {
    let transactions = sqlx::query_as::<_, Transaction>(
        "SELECT * FROM transactions ORDER BY borrowed_on DESC, id DESC",
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(transactions)
}

pub async fn find_for_update(conn: &mut PgConnection, id: i32) -> AppResult<Option<Transaction>> {
    let transaction =
        sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(transaction)
}

pub async fn insert(
    conn: &mut PgConnection,
    book_id: &str,
    member_id: i32,
    per_day_fee: Decimal,
    borrowed_on: DateTime<Utc>,
) -> AppResult<Transaction> {
    let transaction = sqlx::query_as::<_, Transaction>(
        r#"
        INSERT INTO transactions (book_id, member_id, per_day_fee, borrowed_on)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(book_id)
    .bind(member_id)
    .bind(per_day_fee)
    .bind(borrowed_on)
    .fetch_one(&mut *conn)
    .await?;
    Ok(transaction)
}

/// Only an open transaction can be settled.
pub async fn settle(
    conn: &mut PgConnection,
    id: i32,
    returned_on: DateTime<Utc>,
    total_charge: Decimal,
    amount_paid: Decimal,
) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE transactions
        SET returned_on = $1, total_charge = $2, amount_paid = $3
        WHERE id = $4 AND returned_on IS NULL
        "#,
    )
    .bind(returned_on)
    .bind(total_charge)
    .bind(amount_paid)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() == 1)
}
