mod common;

use chrono::Duration;

use common::{book_input, library, member_input, money};
use shelfkeeper_server::{
    models::{BookSearch, IssueBook, ReturnBook},
    AppError,
};

fn issue(book_id: &str, member_id: i32) -> IssueBook {
    IssueBook {
        book_id: book_id.to_string(),
        member_id,
        per_day_fee: money(4),
    }
}

#[tokio::test]
async fn new_book_has_every_copy_on_the_shelf() {
    let lib = library();
    let book = lib.services.catalog.create_book(book_input("B7", 4)).await.unwrap();

    assert_eq!(book.total_quantity, 4);
    assert_eq!(book.available_quantity, 4);
    assert_eq!(book.rented_count, 0);
    assert_eq!(lib.services.catalog.get_book("B7").await.unwrap(), book);
}

#[tokio::test]
async fn duplicate_book_id_is_rejected() {
    let lib = library();
    let s = &lib.services;
    s.catalog.create_book(book_input("B1", 1)).await.unwrap();
    s.catalog.create_book(book_input("B2", 1)).await.unwrap();

    let err = s.catalog.create_book(book_input("B1", 3)).await.unwrap_err();
    assert!(matches!(err, AppError::State(_)));
    assert_eq!(s.catalog.get_book("B1").await.unwrap().total_quantity, 1);

    let err = s.catalog.update_book("B2", book_input("B1", 2)).await.unwrap_err();
    assert!(matches!(err, AppError::State(_)));
    assert!(s.catalog.get_book("B2").await.is_ok());
}

#[tokio::test]
async fn invalid_book_input_is_rejected() {
    let lib = library();
    let mut input = book_input("B1", 0);
    let err = lib.services.catalog.create_book(input.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    input.total_quantity = 2;
    input.isbn = "123".to_string();
    let err = lib.services.catalog.create_book(input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(lib.services.catalog.list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn editing_total_keeps_issued_copies_issued() {
    let lib = library();
    let s = &lib.services;
    s.catalog.create_book(book_input("B1", 5)).await.unwrap();
    let member = s.members.create_member(member_input("Ada")).await.unwrap();
    s.circulation.issue_book(issue("B1", member.id)).await.unwrap();
    s.circulation.issue_book(issue("B1", member.id)).await.unwrap();

    let book = s.catalog.update_book("B1", book_input("B1", 8)).await.unwrap();
    assert_eq!(book.total_quantity, 8);
    assert_eq!(book.available_quantity, 6);
    assert_eq!(book.rented_count, 2);

    let book = s.catalog.update_book("B1", book_input("B1", 2)).await.unwrap();
    assert_eq!(book.available_quantity, 0);

    let err = s.catalog.update_book("B1", book_input("B1", 1)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(s.catalog.get_book("B1").await.unwrap().total_quantity, 2);
}

#[tokio::test]
async fn renaming_a_book_carries_its_transactions() {
    let lib = library();
    let s = &lib.services;
    s.catalog.create_book(book_input("OLD", 2)).await.unwrap();
    let member = s.members.create_member(member_input("Eve")).await.unwrap();
    let t = s.circulation.issue_book(issue("OLD", member.id)).await.unwrap();

    s.catalog.update_book("OLD", book_input("NEW", 2)).await.unwrap();

    let err = s.catalog.get_book("OLD").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(s.circulation.get_transaction(t.id).await.unwrap().book_id, "NEW");

    lib.clock.advance(Duration::days(1));
    let receipt = s
        .circulation
        .return_book(t.id, ReturnBook { amount_paid: money(4) })
        .await
        .unwrap();
    assert_eq!(receipt.book.id, "NEW");
    assert_eq!(receipt.book.available_quantity, 2);
}

#[tokio::test]
async fn books_with_history_cannot_be_deleted() {
    let lib = library();
    let s = &lib.services;
    s.catalog.create_book(book_input("B1", 1)).await.unwrap();
    s.catalog.create_book(book_input("B2", 1)).await.unwrap();
    let member = s.members.create_member(member_input("Max")).await.unwrap();
    s.circulation.issue_book(issue("B1", member.id)).await.unwrap();

    let err = s.catalog.delete_book("B1").await.unwrap_err();
    assert!(matches!(err, AppError::State(_)));
    assert!(s.catalog.get_book("B1").await.is_ok());

    s.catalog.delete_book("B2").await.unwrap();
    let err = s.catalog.delete_book("B2").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn search_matches_title_or_author_ignoring_case() {
    let lib = library();
    let s = &lib.services;
    let mut dune = book_input("D1", 1);
    dune.title = "Dune Messiah".to_string();
    dune.author = "Frank Herbert".to_string();
    s.catalog.create_book(dune).await.unwrap();
    let mut hobbit = book_input("H1", 1);
    hobbit.title = "The Hobbit".to_string();
    hobbit.author = "J.R.R. Tolkien".to_string();
    s.catalog.create_book(hobbit).await.unwrap();

    let found = s
        .catalog
        .search_books(&BookSearch {
            title: Some("messIAH".to_string()),
            author: None,
        })
        .await
        .unwrap();
    assert_eq!(found.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), ["D1"]);

    let found = s
        .catalog
        .search_books(&BookSearch {
            title: Some("dune".to_string()),
            author: Some("tolkien".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 2);

    let found = s
        .catalog
        .search_books(&BookSearch {
            title: Some("100%".to_string()),
            author: None,
        })
        .await
        .unwrap();
    assert!(found.is_empty());

    let err = s.catalog.search_books(&BookSearch::default()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn member_contact_rules() {
    let lib = library();
    let s = &lib.services;

    let mut bad_phone = member_input("Jo");
    bad_phone.phone = "12345".to_string();
    let err = s.members.create_member(bad_phone).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut bad_email = member_input("Jo");
    bad_email.email = "not-an-email".to_string();
    let err = s.members.create_member(bad_email).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let member = s.members.create_member(member_input("Jo")).await.unwrap();
    assert_eq!(member.outstanding_debt(), money(0));
    assert_eq!(member.amount_spent(), money(0));
    assert_eq!(s.members.list_members().await.unwrap().len(), 1);
}

#[tokio::test]
async fn member_update_leaves_balances_alone() {
    let lib = library();
    let s = &lib.services;
    s.catalog.create_book(book_input("B1", 1)).await.unwrap();
    let member = s.members.create_member(member_input("Lee")).await.unwrap();
    let t = s.circulation.issue_book(issue("B1", member.id)).await.unwrap();
    lib.clock.advance(Duration::days(2));
    s.circulation
        .return_book(t.id, ReturnBook { amount_paid: money(5) })
        .await
        .unwrap();

    let mut contact = member_input("Lee Ann");
    contact.phone = "9876543210".to_string();
    let updated = s.members.update_member(member.id, contact).await.unwrap();

    assert_eq!(updated.name, "Lee Ann");
    assert_eq!(updated.phone, "9876543210");
    assert_eq!(updated.outstanding_debt(), money(3));
    assert_eq!(updated.amount_spent(), money(5));

    let err = s
        .members
        .update_member(member.id + 1, member_input("Ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn members_with_history_cannot_be_deleted() {
    let lib = library();
    let s = &lib.services;
    s.catalog.create_book(book_input("B1", 1)).await.unwrap();
    let busy = s.members.create_member(member_input("Busy")).await.unwrap();
    let idle = s.members.create_member(member_input("Idle")).await.unwrap();
    s.circulation.issue_book(issue("B1", busy.id)).await.unwrap();

    let err = s.members.delete_member(busy.id).await.unwrap_err();
    assert!(matches!(err, AppError::State(_)));

    s.members.delete_member(idle.id).await.unwrap();
    let err = s.members.get_member(idle.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
