//! 협력자 저장소 추상화.
//!
//! 게이트웨이는 자격증명, refresh digest, 원장을 직접 저장하지 않습니다.
//! 원격 서비스(또는 개발용 인메모리 구현)가 아래 trait를 구현하며,
//! 게이트웨이는 위임하기 전에 지켜야 할 규칙만 적용합니다.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::types::{AccountId, BalanceDelta, Credential};

// =============================================================================
// CredentialStore
// =============================================================================

/// 로그인 자격증명 저장소.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 로그인으로 자격증명 조회.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound`: 해당 로그인 없음
    async fn find_by_login(&self, login: &str) -> Result<Credential, StoreError>;

    /// 새 계정 생성.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict`: 이미 사용 중인 로그인
    async fn create(&self, login: &str, password_hash: &str) -> Result<AccountId, StoreError>;

    /// 비밀번호 해시 교체.
    async fn store_password(
        &self,
        account_id: AccountId,
        password_hash: &str,
    ) -> Result<(), StoreError>;

    /// 계정 삭제.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound`: 해당 계정 없음
    async fn delete(&self, account_id: AccountId) -> Result<(), StoreError>;
}

// =============================================================================
// RefreshDigestStore
// =============================================================================

/// 계정별 refresh 토큰 digest 저장소.
///
/// 계정당 최대 하나의 digest만 유지하며, `put`은 기존 값을 덮어씁니다.
/// 토큰 회전은 `replace`로 수행해야 같은 refresh 토큰이 두 번 소비되지 않습니다.
#[async_trait]
pub trait RefreshDigestStore: Send + Sync {
    /// digest 저장 (덮어쓰기).
    async fn put(&self, account_id: AccountId, digest: &str) -> Result<(), StoreError>;

    /// 현재 값이 `expected`일 때만 `digest`로 교체 (compare-and-swap).
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict`: 저장된 digest가 없거나 `expected`와 다름
    async fn replace(
        &self,
        account_id: AccountId,
        expected: &str,
        digest: &str,
    ) -> Result<(), StoreError>;

    /// digest 조회.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound`: 저장된 digest 없음
    async fn get(&self, account_id: AccountId) -> Result<String, StoreError>;

    /// digest 삭제. 없으면 아무 일도 하지 않습니다.
    async fn delete(&self, account_id: AccountId) -> Result<(), StoreError>;
}

// =============================================================================
// LedgerStore
// =============================================================================

/// 잔고 원장.
///
/// `apply_delta`는 잔고 부족 검사를 원자적으로 수행하는 최종 판정자입니다.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// 현재 잔고 조회.
    async fn read_balance(&self, account_id: AccountId) -> Result<Decimal, StoreError>;

    /// 잔고 변경 적용 후 새 잔고 반환.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotEnoughMoney`: 원장 기준 잔고 부족
    async fn apply_delta(
        &self,
        account_id: AccountId,
        delta: BalanceDelta,
    ) -> Result<Decimal, StoreError>;
}
