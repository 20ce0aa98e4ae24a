//! 인메모리 협력자 저장소.
//!
//! 내구성이나 복제는 없으며 프로세스가 종료되면 모든 데이터가 사라집니다.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use trader_core::{
    AccountId, BalanceDelta, Credential, CredentialStore, LedgerStore, RefreshDigestStore,
    StoreError,
};

// =============================================================================
// MemoryCredentialStore
// =============================================================================

/// 로그인 → 자격증명 맵.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    by_login: RwLock<HashMap<String, Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_login(&self, login: &str) -> Result<Credential, StoreError> {
        self.by_login
            .read()
            .await
            .get(login)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, login: &str, password_hash: &str) -> Result<AccountId, StoreError> {
        let mut by_login = self.by_login.write().await;
        if by_login.contains_key(login) {
            return Err(StoreError::Conflict);
        }

        let account_id = AccountId::new();
        by_login.insert(
            login.to_string(),
            Credential {
                account_id,
                login: login.to_string(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(account_id)
    }

    async fn store_password(
        &self,
        account_id: AccountId,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut by_login = self.by_login.write().await;
        let credential = by_login
            .values_mut()
            .find(|c| c.account_id == account_id)
            .ok_or(StoreError::NotFound)?;
        credential.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn delete(&self, account_id: AccountId) -> Result<(), StoreError> {
        let mut by_login = self.by_login.write().await;
        let login = by_login
            .iter()
            .find(|(_, c)| c.account_id == account_id)
            .map(|(login, _)| login.clone())
            .ok_or(StoreError::NotFound)?;
        by_login.remove(&login);
        Ok(())
    }
}

// =============================================================================
// MemoryDigestStore
// =============================================================================

/// 계정 → refresh digest 맵.
#[derive(Debug, Default)]
pub struct MemoryDigestStore {
    digests: RwLock<HashMap<AccountId, String>>,
}

impl MemoryDigestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshDigestStore for MemoryDigestStore {
    async fn put(&self, account_id: AccountId, digest: &str) -> Result<(), StoreError> {
        self.digests
            .write()
            .await
            .insert(account_id, digest.to_string());
        Ok(())
    }

    async fn replace(
        &self,
        account_id: AccountId,
        expected: &str,
        digest: &str,
    ) -> Result<(), StoreError> {
        let mut digests = self.digests.write().await;
        match digests.get_mut(&account_id) {
            Some(current) if current == expected => {
                *current = digest.to_string();
                Ok(())
            }
            _ => Err(StoreError::Conflict),
        }
    }

    async fn get(&self, account_id: AccountId) -> Result<String, StoreError> {
        self.digests
            .read()
            .await
            .get(&account_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, account_id: AccountId) -> Result<(), StoreError> {
        self.digests.write().await.remove(&account_id);
        Ok(())
    }
}

// =============================================================================
// MemoryLedger
// =============================================================================

/// 계정 → 잔고 맵.
///
/// 변경은 쓰기 락 안에서 잔고 확인과 함께 적용되므로 음수 잔고가 될 수 없습니다.
/// 처음 보는 계정의 잔고는 0입니다.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    balances: RwLock<HashMap<AccountId, Decimal>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn read_balance(&self, account_id: AccountId) -> Result<Decimal, StoreError> {
        Ok(self
            .balances
            .read()
            .await
            .get(&account_id)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn apply_delta(
        &self,
        account_id: AccountId,
        delta: BalanceDelta,
    ) -> Result<Decimal, StoreError> {
        let mut balances = self.balances.write().await;
        let current = balances.get(&account_id).copied().unwrap_or(Decimal::ZERO);

        let next = current.checked_add(delta.amount()).ok_or_else(|| {
            StoreError::Unavailable("balance overflow".to_string())
        })?;
        if next.is_sign_negative() && !next.is_zero() {
            debug!(account_id = %account_id, "Ledger rejected delta");
            return Err(StoreError::NotEnoughMoney);
        }

        balances.insert(account_id, next);
        Ok(next)
    }
}
