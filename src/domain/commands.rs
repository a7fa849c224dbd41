use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, MemberId, Money, Stock, TransactionId};

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueBook {
    pub member_id: MemberId,
    pub book_id: BookId,
    pub issued_on: NaiveDate,
}

/// コマンド：書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnBook {
    pub transaction_id: TransactionId,
    pub returned_on: NaiveDate,
}

/// コマンド：外部カタログから書籍を取り込む
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportBooks {
    pub title: String,
    pub target_count: usize,
}

/// コマンド：書籍を登録する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddBook {
    pub title: String,
    pub authors: String,
    pub rating: Option<f64>,
    pub stock: Stock,
}

/// コマンド：書籍を更新する（評価は変更しない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBook {
    pub book_id: BookId,
    pub title: String,
    pub authors: String,
    pub stock: Stock,
}

/// コマンド：会員を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMember {
    pub name: String,
    pub email: String,
}

/// コマンド：会員を更新する
///
/// outstanding_debt が None の場合、債務は変更しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMember {
    pub member_id: MemberId,
    pub name: String,
    pub email: String,
    pub outstanding_debt: Option<Money>,
}
