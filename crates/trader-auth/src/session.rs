//! 세션 발급과 refresh 토큰 회전.
//!
//! # refresh digest 프로토콜
//!
//! 1. 로그인/갱신 시 새 토큰 쌍을 발급합니다.
//! 2. refresh 토큰의 SHA-256 digest를 느린 해시로 한 번 더 해싱해 계정별로 저장합니다.
//! 3. 갱신 요청은 저장된 해시와 제시된 refresh 토큰의 digest를 비교합니다.
//! 4. 성공하면 읽었던 저장 값을 compare-and-swap으로 교체하므로 사용된 refresh 토큰은
//!    동시 요청을 포함해 다시 통과하지 못합니다.
//!
//! digest 저장이 실패하면 토큰을 반환하지 않습니다.

use chrono::Duration;
use std::sync::Arc;
use tracing::{info, warn};

use trader_core::{
    AccountId, CredentialStore, GatewayError, GatewayResult, RefreshDigestStore, StoreError,
    TokenClass, TokenPair,
};

use crate::digest::refresh_digest;
use crate::password::{validate_login, validate_password_strength, SecretHasher};
use crate::token::TokenCodec;

/// 기본 access 토큰 유효 기간 (분).
pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;
/// 기본 refresh 토큰 유효 기간 (시간).
pub const DEFAULT_REFRESH_TTL_HOURS: i64 = 72;

/// 가입, 로그인, 토큰 갱신, 계정 삭제를 담당합니다.
///
/// 내부 가변 상태가 없으며 모든 상태는 협력자 저장소에 있습니다.
pub struct SessionIssuer {
    codec: Arc<TokenCodec>,
    hasher: Arc<dyn SecretHasher>,
    credentials: Arc<dyn CredentialStore>,
    digests: Arc<dyn RefreshDigestStore>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl SessionIssuer {
    /// 기본 유효 기간으로 생성.
    pub fn new(
        codec: Arc<TokenCodec>,
        hasher: Arc<dyn SecretHasher>,
        credentials: Arc<dyn CredentialStore>,
        digests: Arc<dyn RefreshDigestStore>,
    ) -> Self {
        Self {
            codec,
            hasher,
            credentials,
            digests,
            access_ttl: Duration::minutes(DEFAULT_ACCESS_TTL_MINUTES),
            refresh_ttl: Duration::hours(DEFAULT_REFRESH_TTL_HOURS),
        }
    }

    /// 토큰 유효 기간 설정.
    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    /// access 토큰 유효 기간.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// 새 계정 생성.
    ///
    /// # Errors
    ///
    /// - `GatewayError::InvalidInput`: 로그인 길이 또는 비밀번호 강도 미달
    /// - `GatewayError::LoginAlreadyExists`: 이미 사용 중인 로그인
    pub async fn sign_up(&self, login: &str, password: &str) -> GatewayResult<AccountId> {
        validate_login(login)?;
        validate_password_strength(password)?;

        let password_hash = self.hasher.hash(password.as_bytes())?;
        let account_id = self.credentials.create(login, &password_hash).await?;

        info!(account_id = %account_id, "Account created");
        Ok(account_id)
    }

    /// 로그인 후 토큰 쌍 발급.
    ///
    /// 로그인 없음과 비밀번호 불일치는 같은 에러로 보고합니다.
    ///
    /// # Errors
    ///
    /// - `GatewayError::InvalidCredentials`: 로그인 없음 또는 비밀번호 불일치
    pub async fn login(&self, login: &str, password: &str) -> GatewayResult<TokenPair> {
        let credential = match self.credentials.find_by_login(login).await {
            Ok(credential) => credential,
            Err(StoreError::NotFound) => {
                // 로그인 존재 여부와 무관하게 느린 해시를 한 번 수행
                let _ = self.hasher.hash(password.as_bytes());
                warn!("Login rejected");
                return Err(GatewayError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !self
            .hasher
            .verify(&credential.password_hash, password.as_bytes())
        {
            warn!("Login rejected");
            return Err(GatewayError::InvalidCredentials);
        }

        let (pair, digest) = self.mint_pair(credential.account_id)?;
        self.digests
            .put(credential.account_id, &digest)
            .await
            .map_err(|e| digest_write_failed(credential.account_id, e))?;

        info!(account_id = %credential.account_id, "Login succeeded");
        Ok(pair)
    }

    /// refresh 토큰 회전.
    ///
    /// 두 토큰 모두 서명, 종류, 만료를 통과해야 하며 같은 계정을 가리켜야 합니다.
    ///
    /// # Errors
    ///
    /// - 토큰 검증 에러 (`Malformed`, `InvalidSignature`, `WrongClass`, `Expired`)
    /// - `GatewayError::IdentityMismatch`: 두 토큰의 식별자가 다름
    /// - `GatewayError::RefreshInvalid`: 저장된 digest 없음 또는 불일치 (재사용, 동시 갱신 포함)
    /// - 새 digest 저장 실패 시 저장소 에러 (토큰 반환 없음)
    pub async fn refresh(&self, pair: &TokenPair) -> GatewayResult<TokenPair> {
        let access = self.codec.validate(&pair.access_token, TokenClass::Access)?;
        let refresh = self
            .codec
            .validate(&pair.refresh_token, TokenClass::Refresh)?;

        let account_id = access.account_id()?;
        if refresh.account_id()? != account_id {
            warn!(account_id = %account_id, "Refresh rejected: identity mismatch");
            return Err(GatewayError::IdentityMismatch);
        }

        let stored = match self.digests.get(account_id).await {
            Ok(stored) => stored,
            Err(StoreError::NotFound) => {
                warn!(account_id = %account_id, "Refresh rejected: no stored digest");
                return Err(GatewayError::RefreshInvalid);
            }
            Err(e) => return Err(e.into()),
        };

        if !self
            .hasher
            .verify(&stored, &refresh_digest(&pair.refresh_token))
        {
            warn!(account_id = %account_id, "Refresh rejected: digest mismatch");
            return Err(GatewayError::RefreshInvalid);
        }

        let (next, digest) = self.mint_pair(account_id)?;
        match self.digests.replace(account_id, &stored, &digest).await {
            Ok(()) => {}
            Err(StoreError::Conflict) => {
                warn!(account_id = %account_id, "Refresh rejected: digest already rotated");
                return Err(GatewayError::RefreshInvalid);
            }
            Err(e) => return Err(digest_write_failed(account_id, e)),
        }

        info!(account_id = %account_id, "Session refreshed");
        Ok(next)
    }

    /// 계정 삭제.
    ///
    /// refresh digest를 먼저 지우고 자격증명을 삭제합니다.
    /// digest 삭제가 실패하면 계정은 그대로 남으므로 다시 시도할 수 있습니다.
    ///
    /// # Errors
    ///
    /// - `GatewayError::AccountNotFound`: 해당 계정 없음
    pub async fn delete_account(&self, account_id: AccountId) -> GatewayResult<()> {
        self.digests.delete(account_id).await?;
        self.credentials.delete(account_id).await?;

        info!(account_id = %account_id, "Account deleted");
        Ok(())
    }

    /// 비밀번호 변경.
    ///
    /// 성공하면 저장된 refresh digest를 지워 기존 세션의 갱신을 막습니다.
    ///
    /// # Errors
    ///
    /// - `GatewayError::InvalidCredentials`: 로그인 없음, 다른 계정의 로그인, 현재 비밀번호 불일치
    /// - `GatewayError::InvalidInput`: 새 비밀번호 강도 미달
    pub async fn change_password(
        &self,
        account_id: AccountId,
        login: &str,
        current_password: &str,
        new_password: &str,
    ) -> GatewayResult<()> {
        let credential = match self.credentials.find_by_login(login).await {
            Ok(credential) => credential,
            Err(StoreError::NotFound) => return Err(GatewayError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if credential.account_id != account_id
            || !self
                .hasher
                .verify(&credential.password_hash, current_password.as_bytes())
        {
            warn!(account_id = %account_id, "Password change rejected");
            return Err(GatewayError::InvalidCredentials);
        }

        validate_password_strength(new_password)?;
        let password_hash = self.hasher.hash(new_password.as_bytes())?;
        self.credentials
            .store_password(account_id, &password_hash)
            .await?;
        self.digests.delete(account_id).await?;

        info!(account_id = %account_id, "Password changed");
        Ok(())
    }

    /// 토큰 쌍과 저장할 refresh digest 해시 생성.
    fn mint_pair(&self, account_id: AccountId) -> GatewayResult<(TokenPair, String)> {
        let pair = TokenPair {
            access_token: self
                .codec
                .issue(account_id, TokenClass::Access, self.access_ttl)?,
            refresh_token: self
                .codec
                .issue(account_id, TokenClass::Refresh, self.refresh_ttl)?,
        };

        let digest = self.hasher.hash(&refresh_digest(&pair.refresh_token))?;
        Ok((pair, digest))
    }
}

fn digest_write_failed(account_id: AccountId, err: StoreError) -> GatewayError {
    warn!(account_id = %account_id, error = %err, "Refresh digest write failed");
    GatewayError::from(err)
}
