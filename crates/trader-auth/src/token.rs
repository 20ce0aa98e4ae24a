//! 서명 토큰 처리.
//!
//! Access Token 및 Refresh Token 생성/검증 로직.
//!
//! 서명 검증([`TokenCodec::verify`])은 무결성만 보장하며 만료를 보지 않습니다.
//! 만료와 토큰 종류 확인은 [`TokenCodec::validate`]가 주입된 시계로 따로 수행합니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::debug;

use trader_core::{
    AccountId, AuthConfig, Clock, GatewayError, GatewayResult, TokenClaims, TokenClass,
};

/// 토큰 종류별 서명 키.
struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    fn from_secret(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }
}

/// HS256 토큰 서명/검증기.
///
/// access/refresh 토큰은 각각 다른 키로 서명되며, `typ` 클레임으로도 구분됩니다.
pub struct TokenCodec {
    access: SigningKey,
    refresh: SigningKey,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// 새로운 TokenCodec 생성.
    ///
    /// # Arguments
    ///
    /// * `access_secret` - access 토큰 서명 키
    /// * `refresh_secret` - refresh 토큰 서명 키
    /// * `clock` - 발급/만료 판정 시계
    pub fn new(
        access_secret: &SecretString,
        refresh_secret: &SecretString,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            access: SigningKey::from_secret(access_secret),
            refresh: SigningKey::from_secret(refresh_secret),
            clock,
        }
    }

    /// 설정에서 생성.
    pub fn from_config(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(&config.access_secret, &config.refresh_secret, clock)
    }

    /// 시계 기준 현재 시각.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn key(&self, class: TokenClass) -> &SigningKey {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    /// 토큰 발급.
    ///
    /// `{id, exp: now + ttl, iat, typ, jti}`를 담아 서명합니다.
    pub fn issue(
        &self,
        account_id: AccountId,
        class: TokenClass,
        ttl: Duration,
    ) -> GatewayResult<String> {
        let claims = TokenClaims::new(account_id, class, self.now(), ttl);
        self.sign(&claims)
    }

    /// 임의의 클레임 서명.
    pub fn sign(&self, claims: &TokenClaims) -> GatewayResult<String> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.key(claims.typ).encoding,
        )
        .map_err(|e| GatewayError::Signing(e.to_string()))
    }

    /// 서명만 검증하고 클레임을 반환합니다.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Malformed`: 토큰 구조, base64, JSON, 필수 클레임 문제
    /// - `GatewayError::InvalidSignature`: 알고리즘 또는 키 검증 실패
    pub fn verify(&self, token: &str, class: TokenClass) -> GatewayResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.key(class).decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature
                | JwtErrorKind::InvalidAlgorithm
                | JwtErrorKind::InvalidAlgorithmName
                | JwtErrorKind::InvalidKeyFormat => GatewayError::InvalidSignature,
                _ => {
                    debug!(error = %e, "Token could not be parsed");
                    GatewayError::Malformed
                }
            })
    }

    /// 서명, 토큰 종류, 만료를 모두 검증합니다.
    ///
    /// # Errors
    ///
    /// [`TokenCodec::verify`]의 에러에 더해
    /// - `GatewayError::WrongClass`: `typ` 클레임이 기대한 종류가 아님
    /// - `GatewayError::Expired`: `exp`가 현재 시각 이전이거나 같음
    pub fn validate(&self, token: &str, class: TokenClass) -> GatewayResult<TokenClaims> {
        let claims = self.verify(token, class)?;

        if claims.typ != class {
            return Err(GatewayError::WrongClass);
        }
        if claims.is_expired_at(self.now()) {
            return Err(GatewayError::Expired);
        }

        Ok(claims)
    }
}
