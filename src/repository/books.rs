//! Book queries for PostgreSQL

use sqlx::PgConnection;

use crate::{error::AppResult, models::Book};

/// Build an ILIKE pattern matching `term` anywhere, with wildcards escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub async fn list(conn: &mut PgConnection) -> AppResult<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title, id")
        .fetch_all(&mut *conn)
        .await?;
    Ok(books)
}

pub async fn search(
    conn: &mut PgConnection,
    title: Option<&str>,
    author: Option<&str>,
) -> AppResult<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT * FROM books
        WHERE ($1::text IS NOT NULL AND title ILIKE $1)
           OR ($2::text IS NOT NULL AND author ILIKE $2)
        ORDER BY title, id
        "#,
    )
    .bind(title.map(contains_pattern))
    .bind(author.map(contains_pattern))
    .fetch_all(&mut *conn)
    .await?;
    Ok(books)
}

pub async fn find(conn: &mut PgConnection, id: &str) -> AppResult<Option<Book>> {
    let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(book)
}

pub async fn insert(conn: &mut PgConnection, book: &Book) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO books (
            id, title, author, language_code, total_quantity, available_quantity,
            rented_count, isbn, isbn13, average_rating, num_pages, ratings_count,
            text_reviews_count, publisher, publication_date
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(&book.id)
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.language_code)
    .bind(book.total_quantity)
    .bind(book.available_quantity)
    .bind(book.rented_count)
    .bind(&book.isbn)
    .bind(&book.isbn13)
    .bind(book.average_rating)
    .bind(book.num_pages)
    .bind(book.ratings_count)
    .bind(book.text_reviews_count)
    .bind(&book.publisher)
    .bind(book.publication_date)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn replace(conn: &mut PgConnection, current_id: &str, book: &Book) -> AppResult<()> {
    // transactions.book_id follows through ON UPDATE CASCADE
    sqlx::query(
        r#"
        UPDATE books SET
            id = $1, title = $2, author = $3, language_code = $4, total_quantity = $5,
            available_quantity = $6, rented_count = $7, isbn = $8, isbn13 = $9,
            average_rating = $10, num_pages = $11, ratings_count = $12,
            text_reviews_count = $13, publisher = $14, publication_date = $15
        WHERE id = $16
        "#,
    )
    .bind(&book.id)
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.language_code)
    .bind(book.total_quantity)
    .bind(book.available_quantity)
    .bind(book.rented_count)
    .bind(&book.isbn)
    .bind(&book.isbn13)
    .bind(book.average_rating)
    .bind(book.num_pages)
    .bind(book.ratings_count)
    .bind(book.text_reviews_count)
    .bind(&book.publisher)
    .bind(book.publication_date)
    .bind(current_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut PgConnection, id: &str) -> AppResult<()> {
    sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Availability is re-checked by the same statement that decrements it.
pub async fn take_copy(conn: &mut PgConnection, id: &str) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE books
        SET available_quantity = available_quantity - 1, rented_count = rented_count + 1
        WHERE id = $1 AND available_quantity > 0
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn restore_copy(conn: &mut PgConnection, id: &str) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE books
        SET available_quantity = available_quantity + 1
        WHERE id = $1 AND available_quantity < total_quantity
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn count_transactions(conn: &mut PgConnection, id: &str) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE book_id = $1")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Harry"), "%Harry%");
        assert_eq!(contains_pattern("100%_done"), "%100\\%\\_done%");
    }
}
