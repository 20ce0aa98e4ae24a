//! trader-auth 통합 테스트 공용 도구.

#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use trader_auth::{Argon2Hasher, SecretHasher, SessionIssuer, TokenCodec};
use trader_core::{
    AccountId, Credential, CredentialStore, HashingConfig, ManualClock, RefreshDigestStore,
    StoreError,
};

pub const ACCESS_SECRET: &str = "access-secret-key-for-session-tests-32-chars";
pub const REFRESH_SECRET: &str = "refresh-secret-key-for-session-tests-32-chars";

pub const LOGIN: &str = "trader01";
pub const PASSWORD: &str = "Password123";

/// 인메모리 자격증명 저장소.
#[derive(Default)]
pub struct MockCredentialStore {
    by_login: Mutex<HashMap<String, Credential>>,
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn find_by_login(&self, login: &str) -> Result<Credential, StoreError> {
        self.by_login
            .lock()
            .unwrap()
            .get(login)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, login: &str, password_hash: &str) -> Result<AccountId, StoreError> {
        let mut by_login = self.by_login.lock().unwrap();
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
        let mut by_login = self.by_login.lock().unwrap();
        let credential = by_login
            .values_mut()
            .find(|c| c.account_id == account_id)
            .ok_or(StoreError::NotFound)?;
        credential.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn delete(&self, account_id: AccountId) -> Result<(), StoreError> {
        let mut by_login = self.by_login.lock().unwrap();
        let before = by_login.len();
        by_login.retain(|_, c| c.account_id != account_id);
        if by_login.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

/// 인메모리 digest 저장소.
///
/// `fail_writes`를 켜면 `put`과 `replace`가, `fail_deletes`를 켜면 `delete`가 실패합니다.
#[derive(Default)]
pub struct MockDigestStore {
    digests: Mutex<HashMap<AccountId, String>>,
    fail_writes: Mutex<bool>,
    fail_deletes: Mutex<bool>,
}

fn offline() -> StoreError {
    StoreError::Unavailable("digest store offline".to_string())
}

impl MockDigestStore {
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        *self.fail_deletes.lock().unwrap() = fail;
    }

    pub fn contains(&self, account_id: AccountId) -> bool {
        self.digests.lock().unwrap().contains_key(&account_id)
    }

    pub fn stored(&self, account_id: AccountId) -> Option<String> {
        self.digests.lock().unwrap().get(&account_id).cloned()
    }
}

#[async_trait]
impl RefreshDigestStore for MockDigestStore {
    async fn put(&self, account_id: AccountId, digest: &str) -> Result<(), StoreError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(offline());
        }
        self.digests
            .lock()
            .unwrap()
            .insert(account_id, digest.to_string());
        Ok(())
    }

    async fn replace(
        &self,
        account_id: AccountId,
        expected: &str,
        digest: &str,
    ) -> Result<(), StoreError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(offline());
        }
        let mut digests = self.digests.lock().unwrap();
        match digests.get_mut(&account_id) {
            Some(current) if current == expected => {
                *current = digest.to_string();
                Ok(())
            }
            _ => Err(StoreError::Conflict),
        }
    }

    async fn get(&self, account_id: AccountId) -> Result<String, StoreError> {
        self.stored(account_id).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, account_id: AccountId) -> Result<(), StoreError> {
        if *self.fail_deletes.lock().unwrap() {
            return Err(offline());
        }
        self.digests.lock().unwrap().remove(&account_id);
        Ok(())
    }
}

/// 테스트용 저비용 Argon2 파라미터.
pub fn cheap_hashing() -> HashingConfig {
    HashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn codec(clock: Arc<ManualClock>) -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(
        &SecretString::new(ACCESS_SECRET.into()),
        &SecretString::new(REFRESH_SECRET.into()),
        clock,
    ))
}

/// 테스트 하네스.
pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub codec: Arc<TokenCodec>,
    pub credentials: Arc<MockCredentialStore>,
    pub digests: Arc<MockDigestStore>,
    pub issuer: Arc<SessionIssuer>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_hasher(Arc::new(Argon2Hasher::new(&cheap_hashing()).unwrap()))
    }

    /// 지정한 해셔로 하네스 생성.
    pub fn with_hasher(hasher: Arc<dyn SecretHasher>) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = codec(clock.clone());
        let credentials = Arc::new(MockCredentialStore::default());
        let digests = Arc::new(MockDigestStore::default());
        let issuer = Arc::new(SessionIssuer::new(
            codec.clone(),
            hasher,
            credentials.clone(),
            digests.clone(),
        ));

        Self {
            clock,
            codec,
            credentials,
            digests,
            issuer,
        }
    }

    /// 기본 계정을 가입시키고 식별자를 반환합니다.
    pub async fn with_account(&self) -> AccountId {
        self.issuer.sign_up(LOGIN, PASSWORD).await.unwrap()
    }
}
