use crate::application::ServiceDependencies;
use crate::domain::{
    Book, BookId, Member, MemberId, TransactionView,
    commands::{AddBook, AddMember, UpdateBook, UpdateMember},
};
use crate::ports::DeleteOutcome;

use super::errors::{CatalogApplicationError, Result};

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CatalogApplicationError::InvalidInput(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

// ============================================================================
// Books
// ============================================================================

/// 書籍を登録する
pub async fn add_book(deps: &ServiceDependencies, cmd: AddBook) -> Result<Book> {
    require_non_empty("title", &cmd.title)?;

    let book = Book::new(cmd.title, cmd.authors, cmd.rating, cmd.stock);
    deps.book_repository
        .insert(book.clone())
        .await
        .map_err(CatalogApplicationError::BookRepositoryError)?;

    tracing::info!(book_id = %book.book_id.value(), "Book added");
    Ok(book)
}

pub async fn get_book(deps: &ServiceDependencies, book_id: BookId) -> Result<Book> {
    deps.book_repository
        .get_by_id(book_id)
        .await
        .map_err(CatalogApplicationError::BookRepositoryError)?
        .ok_or(CatalogApplicationError::BookNotFound)
}

pub async fn list_books(deps: &ServiceDependencies) -> Result<Vec<Book>> {
    deps.book_repository
        .list()
        .await
        .map_err(CatalogApplicationError::BookRepositoryError)
}

/// 書籍を更新する
///
/// タイトル・著者・在庫を上書きする。評価は変更しない。
pub async fn update_book(deps: &ServiceDependencies, cmd: UpdateBook) -> Result<Book> {
    require_non_empty("title", &cmd.title)?;

    let current = get_book(deps, cmd.book_id).await?;
    let book = Book {
        title: cmd.title,
        authors: cmd.authors,
        stock: cmd.stock,
        ..current
    };

    let updated = deps
        .book_repository
        .update(book.clone())
        .await
        .map_err(CatalogApplicationError::BookRepositoryError)?;

    if !updated {
        return Err(CatalogApplicationError::BookNotFound);
    }

    tracing::info!(book_id = %book.book_id.value(), "Book updated");
    Ok(book)
}

/// 書籍を削除する
///
/// 貸出取引から参照されている書籍は削除しない。
pub async fn delete_book(deps: &ServiceDependencies, book_id: BookId) -> Result<()> {
    let outcome = deps
        .book_repository
        .delete(book_id)
        .await
        .map_err(CatalogApplicationError::BookRepositoryError)?;

    match outcome {
        DeleteOutcome::Deleted => {
            tracing::info!(book_id = %book_id.value(), "Book deleted");
            Ok(())
        }
        DeleteOutcome::NotFound => Err(CatalogApplicationError::BookNotFound),
        DeleteOutcome::Referenced => Err(CatalogApplicationError::BookHasTransactions),
    }
}

// ============================================================================
// Members
// ============================================================================

/// 会員を登録する（債務0）
pub async fn add_member(deps: &ServiceDependencies, cmd: AddMember) -> Result<Member> {
    require_non_empty("name", &cmd.name)?;
    require_non_empty("email", &cmd.email)?;

    let member = Member::new(cmd.name, cmd.email);
    deps.member_repository
        .insert(member.clone())
        .await
        .map_err(CatalogApplicationError::MemberRepositoryError)?;

    tracing::info!(member_id = %member.member_id.value(), "Member added");
    Ok(member)
}

pub async fn get_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<Member> {
    deps.member_repository
        .get_by_id(member_id)
        .await
        .map_err(CatalogApplicationError::MemberRepositoryError)?
        .ok_or(CatalogApplicationError::MemberNotFound)
}

pub async fn list_members(deps: &ServiceDependencies) -> Result<Vec<Member>> {
    deps.member_repository
        .list()
        .await
        .map_err(CatalogApplicationError::MemberRepositoryError)
}

/// 会員を更新する
///
/// 債務は指定された場合のみ上書きする。負の債務は受け付けない。
pub async fn update_member(deps: &ServiceDependencies, cmd: UpdateMember) -> Result<Member> {
    require_non_empty("name", &cmd.name)?;
    require_non_empty("email", &cmd.email)?;
    if cmd.outstanding_debt.is_some_and(|debt| debt.is_negative()) {
        return Err(CatalogApplicationError::InvalidInput(
            "outstanding_debt must not be negative".to_string(),
        ));
    }

    let current = get_member(deps, cmd.member_id).await?;
    let member = Member {
        name: cmd.name,
        email: cmd.email,
        outstanding_debt: cmd.outstanding_debt.unwrap_or(current.outstanding_debt),
        ..current
    };

    let updated = deps
        .member_repository
        .update(member.clone())
        .await
        .map_err(CatalogApplicationError::MemberRepositoryError)?;

    if !updated {
        return Err(CatalogApplicationError::MemberNotFound);
    }

    tracing::info!(member_id = %member.member_id.value(), "Member updated");
    Ok(member)
}

/// 会員を削除する
///
/// 貸出取引から参照されている会員は削除しない。
pub async fn delete_member(deps: &ServiceDependencies, member_id: MemberId) -> Result<()> {
    let outcome = deps
        .member_repository
        .delete(member_id)
        .await
        .map_err(CatalogApplicationError::MemberRepositoryError)?;

    match outcome {
        DeleteOutcome::Deleted => {
            tracing::info!(member_id = %member_id.value(), "Member deleted");
            Ok(())
        }
        DeleteOutcome::NotFound => Err(CatalogApplicationError::MemberNotFound),
        DeleteOutcome::Referenced => Err(CatalogApplicationError::MemberHasTransactions),
    }
}

// ============================================================================
// Transactions
// ============================================================================

/// 会員名・書籍タイトルを結合した取引一覧
pub async fn list_transactions(deps: &ServiceDependencies) -> Result<Vec<TransactionView>> {
    deps.transaction_repository
        .list_views()
        .await
        .map_err(CatalogApplicationError::TransactionRepositoryError)
}

/// 貸出フォーム用の選択肢
#[derive(Debug, Clone)]
pub struct IssueForm {
    pub members: Vec<Member>,
    pub books: Vec<Book>,
}

/// 貸出フォーム用に会員と書籍を並行して取得する
pub async fn issue_form(deps: &ServiceDependencies) -> Result<IssueForm> {
    let (members, books) = futures::try_join!(list_members(deps), list_books(deps))?;
    Ok(IssueForm { members, books })
}
