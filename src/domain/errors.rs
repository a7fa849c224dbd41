/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueBookError {
    /// 会員の延滞債務が上限を超えている
    DebtLimitExceeded,
    /// 在庫切れ
    OutOfStock,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnBookError {
    /// 既に返却済み
    AlreadyReturned,
    /// 料金を加算すると債務が表現可能な範囲を超える
    DebtOverflow,
}
