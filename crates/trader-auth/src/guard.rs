//! Bearer 헤더 인증.

use std::sync::Arc;
use tracing::debug;

use trader_core::{AccountId, GatewayError, GatewayResult, TokenClass};

use crate::token::TokenCodec;

/// Authorization 헤더의 스킴 접두사.
pub const BEARER_PREFIX: &str = "Bearer ";

/// 요청의 `Authorization` 헤더를 계정 식별자로 변환합니다.
///
/// 상태가 없고 읽기 전용이므로 여러 요청에서 동시에 사용해도 안전합니다.
#[derive(Clone)]
pub struct AuthGuard {
    codec: Arc<TokenCodec>,
}

impl AuthGuard {
    /// 새로운 AuthGuard 생성.
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// 헤더 값을 인증합니다.
    ///
    /// # Errors
    ///
    /// - `GatewayError::MissingHeader`: 헤더 없음 또는 빈 값
    /// - `GatewayError::MalformedHeader`: `Bearer ` 접두사 없음 또는 빈 토큰
    /// - `GatewayError::InvalidToken`: 서명, 종류, 만료 검증 실패
    /// - `GatewayError::MalformedClaims`: 식별자 클레임 누락 또는 파싱 실패
    pub fn authenticate(&self, header: Option<&str>) -> GatewayResult<AccountId> {
        let header = header
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(GatewayError::MissingHeader)?;

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(GatewayError::MalformedHeader)?;

        let claims = self
            .codec
            .validate(token, TokenClass::Access)
            .map_err(|e| {
                debug!(reason = %e, "Bearer token rejected");
                GatewayError::InvalidToken
            })?;

        claims.account_id()
    }
}
