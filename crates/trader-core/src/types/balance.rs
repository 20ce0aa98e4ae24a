//! 잔고 스냅샷과 잔고 변경량.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AccountId;

/// 특정 시점의 계정 잔고.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// 계정 식별자
    pub account_id: AccountId,
    /// 사용 가능 금액
    pub amount: Decimal,
    /// 조회 시각
    pub as_of: DateTime<Utc>,
}

impl BalanceSnapshot {
    /// 이 스냅샷이 주어진 출금액을 감당하는지 확인.
    ///
    /// 잔고가 출금액보다 엄격히 커야 합니다. 잔고 전액 출금은 거부됩니다.
    pub fn covers(&self, withdrawal: Decimal) -> bool {
        self.amount > withdrawal.abs()
    }
}

/// 부호 있는 잔고 변경량 (양수: 입금, 음수: 출금).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceDelta(Decimal);

impl BalanceDelta {
    /// 부호 있는 금액으로 생성.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// 입금 변경량 생성.
    pub fn deposit(amount: Decimal) -> Self {
        Self(amount.abs())
    }

    /// 출금 변경량 생성.
    pub fn withdrawal(amount: Decimal) -> Self {
        Self(-amount.abs())
    }

    /// 부호 있는 금액.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// 절대값.
    pub fn magnitude(&self) -> Decimal {
        self.0.abs()
    }

    /// 출금인지 확인.
    pub fn is_withdrawal(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}
