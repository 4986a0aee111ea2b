//! Member queries for PostgreSQL

use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::{
    error::AppResult,
    models::{Member, MemberInput},
};

pub async fn list(conn: &mut PgConnection) -> AppResult<Vec<Member>> {
    let members = sqlx::query_as::<_, Member>("SELECT * FROM members ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;
    Ok(members)
}

pub async fn find_for_update(conn: &mut PgConnection, id: i32) -> AppResult<Option<Member>> {
    let member = sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(member)
}

pub async fn insert(conn: &mut PgConnection, input: &MemberInput) -> AppResult<Member> {
    let member = sqlx::query_as::<_, Member>(
        r#"
        INSERT INTO members (name, email, phone, outstanding_debt, amount_spent)
        VALUES ($1, $2, $3, 0, 0)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .fetch_one(&mut *conn)
    .await?;
    Ok(member)
}

pub async fn update_contact(conn: &mut PgConnection, id: i32, input: &MemberInput) -> AppResult<bool> {
    let result = sqlx::query("UPDATE members SET name = $1, email = $2, phone = $3 WHERE id = $4")
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn update_balance(
    conn: &mut PgConnection,
    id: i32,
    outstanding_debt: Decimal,
    amount_spent: Decimal,
) -> AppResult<()> {
    sqlx::query("UPDATE members SET outstanding_debt = $1, amount_spent = $2 WHERE id = $3")
        .bind(outstanding_debt)
        .bind(amount_spent)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn delete(conn: &mut PgConnection, id: i32) -> AppResult<()> {
    sqlx::query("DELETE FROM members WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn count_transactions(conn: &mut PgConnection, id: i32) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE member_id = $1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}
