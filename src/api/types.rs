use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::import::{ImportOutcome, ImportReport};
use crate::application::lending::ReturnReceipt;
use crate::domain::{
    Book, BookId, Member, MemberId, Money, Stock, Transaction, TransactionView,
    commands::{AddBook, AddMember, ImportBooks, IssueBook, UpdateBook, UpdateMember},
};

// ============================================================================
// Requests
// ============================================================================

/// 書籍登録リクエスト（POST /books）
#[derive(Debug, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
    #[serde(default)]
    pub authors: String,
    pub rating: Option<f64>,
    pub stock: i64,
}

impl AddBookRequest {
    pub fn to_command(self) -> Result<AddBook, String> {
        Ok(AddBook {
            title: self.title,
            authors: self.authors,
            rating: self.rating,
            stock: parse_stock(self.stock)?,
        })
    }
}

/// 書籍更新リクエスト（PUT /books/:id）
#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub title: String,
    #[serde(default)]
    pub authors: String,
    pub stock: i64,
}

impl UpdateBookRequest {
    pub fn to_command(self, book_id: BookId) -> Result<UpdateBook, String> {
        Ok(UpdateBook {
            book_id,
            title: self.title,
            authors: self.authors,
            stock: parse_stock(self.stock)?,
        })
    }
}

/// 会員登録リクエスト（POST /members）
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub name: String,
    pub email: String,
}

impl AddMemberRequest {
    pub fn to_command(self) -> AddMember {
        AddMember {
            name: self.name,
            email: self.email,
        }
    }
}

/// 会員更新リクエスト（PUT /members/:id）
///
/// outstanding_debt は通貨単位（小数可）。省略時は変更しない。
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: String,
    pub email: String,
    pub outstanding_debt: Option<f64>,
}

impl UpdateMemberRequest {
    pub fn to_command(self, member_id: MemberId) -> Result<UpdateMember, String> {
        let outstanding_debt = self.outstanding_debt.map(parse_money).transpose()?;
        Ok(UpdateMember {
            member_id,
            name: self.name,
            email: self.email,
            outstanding_debt,
        })
    }
}

/// 貸出リクエスト（POST /issue）
#[derive(Debug, Deserialize)]
pub struct IssueBookRequest {
    pub member_id: Uuid,
    pub book_id: Uuid,
}

impl IssueBookRequest {
    pub fn to_command(self, issued_on: NaiveDate) -> IssueBook {
        IssueBook {
            member_id: MemberId::from_uuid(self.member_id),
            book_id: BookId::from_uuid(self.book_id),
            issued_on,
        }
    }
}

/// 一括取り込みリクエスト（POST /import）
#[derive(Debug, Deserialize)]
pub struct ImportBooksRequest {
    #[serde(default)]
    pub title: String,
    pub num_books: i64,
}

impl ImportBooksRequest {
    /// 0以下の件数は「取り込みなし」として扱う
    pub fn to_command(self) -> ImportBooks {
        ImportBooks {
            title: self.title,
            target_count: usize::try_from(self.num_books).unwrap_or(0),
        }
    }
}

/// 在庫はストアのINTEGER列に収まる範囲（0..=i32::MAX）のみ受け付ける
fn parse_stock(stock: i64) -> Result<Stock, String> {
    let invalid = || format!("stock must be an integer between 0 and {}, got {}", i32::MAX, stock);
    if stock > i64::from(i32::MAX) {
        return Err(invalid());
    }
    Stock::try_from(stock).map_err(|_| invalid())
}

fn parse_money(amount: f64) -> Result<Money, String> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("amount must be a non-negative number, got {}", amount));
    }
    // i64::MAX as f64 は 2^63 に丸められるため、それ以上は範囲外
    let minor = (amount * 100.0).round();
    if minor >= i64::MAX as f64 {
        return Err(format!("amount is too large, got {}", amount));
    }
    Ok(Money::from_minor(minor as i64))
}

/// 金額を通貨単位の数値として表す
fn money_value(money: Money) -> f64 {
    money.minor_units() as f64 / 100.0
}

// ============================================================================
// Responses
// ============================================================================

/// 書籍レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub book_id: Uuid,
    pub title: String,
    pub authors: String,
    pub rating: Option<f64>,
    pub stock: u32,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            book_id: book.book_id.value(),
            title: book.title,
            authors: book.authors,
            rating: book.rating,
            stock: book.stock.value(),
        }
    }
}

/// 会員レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberResponse {
    pub member_id: Uuid,
    pub name: String,
    pub email: String,
    pub outstanding_debt: f64,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            member_id: member.member_id.value(),
            name: member.name,
            email: member.email,
            outstanding_debt: money_value(member.outstanding_debt),
        }
    }
}

/// 取引レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction_id: Uuid,
    pub member_id: Uuid,
    pub book_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    pub issue_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub fee: f64,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            transaction_id: transaction.transaction_id.value(),
            member_id: transaction.member_id.value(),
            book_id: transaction.book_id.value(),
            member_name: None,
            book_title: None,
            issue_date: transaction.issue_date,
            return_date: transaction.return_date,
            fee: money_value(transaction.fee),
        }
    }
}

impl From<TransactionView> for TransactionResponse {
    fn from(view: TransactionView) -> Self {
        Self {
            member_name: Some(view.member_name),
            book_title: Some(view.book_title),
            ..Self::from(view.transaction)
        }
    }
}

/// 操作結果のメッセージ付きレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse<T> {
    pub message: String,
    #[serde(flatten)]
    pub data: T,
}

/// 貸出レスポンス（POST /issue）
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueResponse {
    pub message: String,
    pub transaction: TransactionResponse,
}

/// 返却レスポンス（POST /transactions/:id/return）
///
/// status は "ok" または債務上限を超えた場合の "warning"。
#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnResponse {
    pub status: String,
    pub message: String,
    pub transaction: TransactionResponse,
    pub fee: f64,
    pub outstanding_debt: f64,
    pub over_debt_limit: bool,
}

impl From<ReturnReceipt> for ReturnResponse {
    fn from(receipt: ReturnReceipt) -> Self {
        let over_debt_limit = receipt.debt_status.is_over_limit();
        let (status, message) = if over_debt_limit {
            (
                "warning",
                format!(
                    "Book returned. Rental fee: {}. Member has exceeded the debt limit of 500!",
                    receipt.fee
                ),
            )
        } else {
            (
                "ok",
                format!("Book returned successfully! Rental fee: {}", receipt.fee),
            )
        };

        Self {
            status: status.to_string(),
            message,
            transaction: TransactionResponse::from(receipt.transaction),
            fee: money_value(receipt.fee),
            outstanding_debt: money_value(receipt.outstanding_debt),
            over_debt_limit,
        }
    }
}

/// 一括取り込みレスポンス（POST /import）
///
/// status は "complete" または "partial"。
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub status: String,
    pub message: String,
    pub imported: usize,
    pub requested: usize,
    pub pages_requested: u32,
}

impl From<ImportReport> for ImportResponse {
    fn from(report: ImportReport) -> Self {
        let (status, message) = match &report.outcome {
            ImportOutcome::Completed => (
                "complete",
                format!("Successfully imported {} books!", report.imported),
            ),
            ImportOutcome::ApiFailure { page, reason } => (
                "partial",
                format!(
                    "Failed to fetch books from the API (page {}: {}). Imported {} books.",
                    page, reason, report.imported
                ),
            ),
            ImportOutcome::Exhausted { .. } => (
                "partial",
                format!(
                    "The catalog has no more matching books. Imported {} books.",
                    report.imported
                ),
            ),
        };

        Self {
            status: status.to_string(),
            message,
            imported: report.imported,
            requested: report.requested,
            pages_requested: report.pages_requested,
        }
    }
}

/// 貸出フォーム用レスポンス（GET /issue）
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueFormResponse {
    pub members: Vec<MemberResponse>,
    pub books: Vec<BookResponse>,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
