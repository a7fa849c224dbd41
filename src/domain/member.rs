use serde::{Deserialize, Serialize};

use super::value_objects::{MemberId, Money};

/// 会員
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub email: String,
    /// 未払いの延滞債務（返却済み取引の料金の累計）
    pub outstanding_debt: Money,
}

impl Member {
    /// 債務0の会員を作成
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            member_id: MemberId::new(),
            name: name.into(),
            email: email.into(),
            outstanding_debt: Money::ZERO,
        }
    }
}
