//! 잔고 변경 가드.
//!
//! 출금을 원장에 위임하기 전에 최신 잔고 스냅샷으로 초과 인출 여부를 확인합니다.
//!
//! 이 검사는 사전 검사일 뿐입니다. 스냅샷 조회와 원장 쓰기는 하나의 원자적
//! 연산이 아니므로 동시 출금이 같은 스냅샷을 통과할 수 있으며,
//! 최종 판정은 [`LedgerStore::apply_delta`]가 원자적으로 수행합니다.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

use trader_core::{
    AccountId, BalanceDelta, BalanceSnapshot, Clock, GatewayError, GatewayResult, LedgerStore,
};

/// 출금 사전 검사기.
#[derive(Clone)]
pub struct BalanceGuard {
    ledger: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
}

impl BalanceGuard {
    /// 새로운 BalanceGuard 생성.
    pub fn new(ledger: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }

    /// 최신 잔고 스냅샷 조회.
    pub async fn snapshot(&self, account_id: AccountId) -> GatewayResult<BalanceSnapshot> {
        let amount = self.ledger.read_balance(account_id).await?;
        Ok(BalanceSnapshot {
            account_id,
            amount,
            as_of: self.clock.now(),
        })
    }

    /// 잔고 변경 허용 여부 확인.
    ///
    /// 0 이상의 변경량(입금)은 원장을 조회하지 않고 항상 허용합니다.
    /// 출금은 `snapshot.amount > |delta|`일 때만 허용합니다.
    ///
    /// # Errors
    ///
    /// - `GatewayError::InsufficientFunds`: 잔고가 출금액보다 크지 않음
    pub async fn authorize(&self, account_id: AccountId, delta: BalanceDelta) -> GatewayResult<()> {
        if !delta.is_withdrawal() {
            return Ok(());
        }

        let snapshot = self.snapshot(account_id).await?;
        if !snapshot.covers(delta.amount()) {
            warn!(
                account_id = %account_id,
                balance = %snapshot.amount,
                withdrawal = %delta.magnitude(),
                "Withdrawal rejected by balance guard"
            );
            return Err(GatewayError::InsufficientFunds);
        }

        Ok(())
    }
}

/// 잔고 조회와 변경.
///
/// [`BalanceGuard`]의 사전 검사를 통과한 변경만 원장에 위임합니다.
#[derive(Clone)]
pub struct BalanceService {
    guard: BalanceGuard,
    ledger: Arc<dyn LedgerStore>,
}

impl BalanceService {
    /// 새로운 BalanceService 생성.
    pub fn new(ledger: Arc<dyn LedgerStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            guard: BalanceGuard::new(ledger.clone(), clock),
            ledger,
        }
    }

    /// 현재 잔고.
    pub async fn balance(&self, account_id: AccountId) -> GatewayResult<Decimal> {
        Ok(self.ledger.read_balance(account_id).await?)
    }

    /// 부호 있는 변경량 적용 후 새 잔고 반환.
    ///
    /// # Errors
    ///
    /// - `GatewayError::InvalidInput`: 변경량이 0
    /// - `GatewayError::InsufficientFunds`: 사전 검사 실패
    /// - `GatewayError::NotEnoughMoney`: 원장의 최종 검사 실패
    pub async fn apply(&self, account_id: AccountId, delta: BalanceDelta) -> GatewayResult<Decimal> {
        if delta.amount().is_zero() {
            return Err(GatewayError::InvalidInput(
                "변경 금액은 0이 아니어야 합니다".to_string(),
            ));
        }

        let span = trader_core::session_span!("balance_apply", account_id);
        async move {
            self.guard.authorize(account_id, delta).await?;
            let balance = self.ledger.apply_delta(account_id, delta).await?;

            info!(delta = %delta.amount(), balance = %balance, "Balance updated");
            Ok(balance)
        }
        .instrument(span)
        .await
    }

    /// 입금.
    pub async fn deposit(&self, account_id: AccountId, amount: Decimal) -> GatewayResult<Decimal> {
        Self::ensure_positive(amount)?;
        self.apply(account_id, BalanceDelta::deposit(amount)).await
    }

    /// 출금.
    pub async fn withdraw(&self, account_id: AccountId, amount: Decimal) -> GatewayResult<Decimal> {
        Self::ensure_positive(amount)?;
        self.apply(account_id, BalanceDelta::withdrawal(amount)).await
    }

    fn ensure_positive(amount: Decimal) -> GatewayResult<()> {
        if amount <= Decimal::ZERO {
            return Err(GatewayError::InvalidInput(
                "금액은 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}
