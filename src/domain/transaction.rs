use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::value_objects::{BookId, MemberId, Money, TransactionId};

/// 貸出取引
///
/// 貸出時に作成され、返却時に一度だけ更新される。
/// return_date が None の取引は貸出中を表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub member_id: MemberId,
    pub book_id: BookId,
    pub issue_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub fee: Money,
}

impl Transaction {
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// 一覧表示用の取引ビュー
///
/// 会員名と書籍タイトルをクエリ時に結合したもの。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionView {
    pub transaction: Transaction,
    pub member_name: String,
    pub book_title: String,
}
