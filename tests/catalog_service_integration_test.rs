use chrono::NaiveDate;
use library_lending::application::catalog::{self, CatalogApplicationError};
use library_lending::application::lending::issue_book;
use library_lending::domain::commands::{AddBook, AddMember, IssueBook, UpdateBook, UpdateMember};
use library_lending::domain::{BookId, MemberId, Money, Stock};

mod common;

use common::{in_memory_context, seed_book, seed_member};

#[tokio::test]
async fn test_add_and_list_books_sorted_by_title() {
    let ctx = in_memory_context();

    for title in ["Walden", "Beloved", "Middlemarch"] {
        catalog::add_book(
            &ctx.deps,
            AddBook {
                title: title.to_string(),
                authors: String::new(),
                rating: None,
                stock: Stock::new(1),
            },
        )
        .await
        .unwrap();
    }

    let titles: Vec<String> = catalog::list_books(&ctx.deps)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, vec!["Beloved", "Middlemarch", "Walden"]);
}

#[tokio::test]
async fn test_add_book_requires_title() {
    let ctx = in_memory_context();

    let result = catalog::add_book(
        &ctx.deps,
        AddBook {
            title: "   ".to_string(),
            authors: "Anon".to_string(),
            rating: None,
            stock: Stock::new(1),
        },
    )
    .await;

    assert!(matches!(result, Err(CatalogApplicationError::InvalidInput(_))));
}

#[tokio::test]
async fn test_update_book_keeps_rating() {
    let ctx = in_memory_context();
    let book = seed_book(&ctx.store, 1);

    let updated = catalog::update_book(
        &ctx.deps,
        UpdateBook {
            book_id: book.book_id,
            title: "Renamed".to_string(),
            authors: "Someone Else".to_string(),
            stock: Stock::new(9),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.stock.value(), 9);
    assert_eq!(updated.rating, book.rating);
    assert_eq!(ctx.store.book(book.book_id).unwrap(), updated);
}

#[tokio::test]
async fn test_update_unknown_book() {
    let ctx = in_memory_context();

    let result = catalog::update_book(
        &ctx.deps,
        UpdateBook {
            book_id: BookId::new(),
            title: "Ghost".to_string(),
            authors: String::new(),
            stock: Stock::new(0),
        },
    )
    .await;

    assert!(matches!(result, Err(CatalogApplicationError::BookNotFound)));
}

#[tokio::test]
async fn test_delete_book_referenced_by_transaction() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 1);
    issue_book(
        &ctx.deps,
        IssueBook {
            member_id: member.member_id,
            book_id: book.book_id,
            issued_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        },
    )
    .await
    .unwrap();

    let book_result = catalog::delete_book(&ctx.deps, book.book_id).await;
    let member_result = catalog::delete_member(&ctx.deps, member.member_id).await;

    assert!(matches!(book_result, Err(CatalogApplicationError::BookHasTransactions)));
    assert!(matches!(member_result, Err(CatalogApplicationError::MemberHasTransactions)));
}

#[tokio::test]
async fn test_delete_unknown_member() {
    let ctx = in_memory_context();

    let result = catalog::delete_member(&ctx.deps, MemberId::new()).await;

    assert!(matches!(result, Err(CatalogApplicationError::MemberNotFound)));
}

#[tokio::test]
async fn test_add_member_starts_without_debt() {
    let ctx = in_memory_context();

    let member = catalog::add_member(
        &ctx.deps,
        AddMember {
            name: "Lin".to_string(),
            email: "lin@example.com".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(member.outstanding_debt, Money::ZERO);
    assert_eq!(ctx.store.member(member.member_id), Some(member));
}

#[tokio::test]
async fn test_update_member_without_debt_keeps_debt() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 75);

    let updated = catalog::update_member(
        &ctx.deps,
        UpdateMember {
            member_id: member.member_id,
            name: "New Name".to_string(),
            email: member.email.clone(),
            outstanding_debt: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.outstanding_debt, Money::from_major(75));
}

#[tokio::test]
async fn test_update_member_rejects_negative_debt() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);

    let result = catalog::update_member(
        &ctx.deps,
        UpdateMember {
            member_id: member.member_id,
            name: member.name.clone(),
            email: member.email.clone(),
            outstanding_debt: Some(Money::from_minor(-1)),
        },
    )
    .await;

    assert!(matches!(result, Err(CatalogApplicationError::InvalidInput(_))));
}

#[tokio::test]
async fn test_list_transactions_newest_first() {
    let ctx = in_memory_context();
    let member = seed_member(&ctx.store, 0);
    let book = seed_book(&ctx.store, 2);

    for day in [3, 10] {
        issue_book(
            &ctx.deps,
            IssueBook {
                member_id: member.member_id,
                book_id: book.book_id,
                issued_on: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            },
        )
        .await
        .unwrap();
    }

    let views = catalog::list_transactions(&ctx.deps).await.unwrap();

    assert_eq!(views.len(), 2);
    assert_eq!(
        views[0].transaction.issue_date,
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    );
    assert_eq!(views[0].member_name, member.name);
    assert_eq!(views[0].book_title, book.title);
}
