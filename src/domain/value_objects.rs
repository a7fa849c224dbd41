use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;
use uuid::Uuid;

/// 書籍ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

/// 会員ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

/// 貸出取引ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

/// 金額（補助通貨単位の整数）
///
/// 100補助単位 = 1通貨単位。料金と延滞債務の計算を誤差なく行うため、
/// 浮動小数点ではなく整数で保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// 補助通貨単位から作成
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// 通貨単位から作成
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// 加算。i64の範囲を超える場合は None
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * rhs)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// 在庫数エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    /// 在庫切れ
    Exhausted,
    /// 負の在庫数
    Negative(i64),
}

/// 在庫数
///
/// 不変条件：在庫数は負にならない。
/// 型で非負を保証し、減算は在庫がある場合のみ成功する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Stock(u32);

impl Stock {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// 在庫を1冊減らす
    ///
    /// # エラー
    /// 在庫が0の場合は`StockError::Exhausted`を返す
    pub fn decrement(self) -> Result<Self, StockError> {
        match self.0.checked_sub(1) {
            Some(value) => Ok(Self(value)),
            None => Err(StockError::Exhausted),
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_available(&self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<i64> for Stock {
    type Error = StockError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| StockError::Negative(value))
    }
}
