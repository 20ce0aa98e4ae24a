//! 토큰 클레임과 토큰 쌍.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AccountId;
use crate::error::GatewayError;

/// 토큰 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    /// 개별 요청을 인가하는 단기 토큰
    Access,
    /// 새 토큰 쌍 발급에만 쓰이는 장기 토큰
    Refresh,
}

impl TokenClass {
    /// 클레임에 기록되는 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenClass::Access => "access",
            TokenClass::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 서명된 토큰의 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 계정 식별자 (UUID 문자열)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Expiration - 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// Issued At - 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 토큰 종류
    pub typ: TokenClass,
    /// JWT ID - 같은 초에 발급된 토큰도 서로 다르게 만드는 고유 값
    pub jti: String,
}

impl TokenClaims {
    /// 새로운 클레임 생성.
    ///
    /// # Arguments
    ///
    /// * `account_id` - 계정 식별자
    /// * `class` - 토큰 종류
    /// * `issued_at` - 발급 시각
    /// * `ttl` - 유효 기간
    pub fn new(
        account_id: AccountId,
        class: TokenClass,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: Some(account_id.to_string()),
            exp: (issued_at + ttl).timestamp(),
            iat: issued_at.timestamp(),
            typ: class,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// 주어진 시각 기준으로 만료되었는지 확인.
    ///
    /// `exp`가 `now`보다 엄격히 뒤에 있을 때만 유효합니다.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    /// 식별자 클레임을 파싱합니다.
    pub fn account_id(&self) -> Result<AccountId, GatewayError> {
        self.id
            .as_deref()
            .ok_or(GatewayError::MalformedClaims)?
            .parse()
            .map_err(|_| GatewayError::MalformedClaims)
    }
}

/// Access Token + Refresh Token 쌍.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access Token
    pub access_token: String,
    /// Refresh Token
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_expiry_boundary() {
        let now = Utc::now();
        let claims = TokenClaims::new(AccountId::new(), TokenClass::Access, now, Duration::minutes(15));

        assert!(!claims.is_expired_at(now));
        assert!(!claims.is_expired_at(now + Duration::minutes(14)));
        assert!(claims.is_expired_at(now + Duration::minutes(15)));
        assert!(claims.is_expired_at(now + Duration::hours(1)));
    }

    #[test]
    fn test_claims_account_id() {
        let id = AccountId::new();
        let claims = TokenClaims::new(id, TokenClass::Refresh, Utc::now(), Duration::hours(72));
        assert_eq!(claims.account_id().unwrap(), id);
    }

    #[test]
    fn test_claims_missing_or_bad_id() {
        let mut claims =
            TokenClaims::new(AccountId::new(), TokenClass::Access, Utc::now(), Duration::minutes(1));

        claims.id = Some("12345".to_string());
        assert_eq!(claims.account_id(), Err(GatewayError::MalformedClaims));

        claims.id = None;
        assert_eq!(claims.account_id(), Err(GatewayError::MalformedClaims));
    }

    #[test]
    fn test_claims_have_unique_jti() {
        let id = AccountId::new();
        let now = Utc::now();
        let a = TokenClaims::new(id, TokenClass::Refresh, now, Duration::hours(1));
        let b = TokenClaims::new(id, TokenClass::Refresh, now, Duration::hours(1));
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_token_class_serialization() {
        assert_eq!(serde_json::to_string(&TokenClass::Access).unwrap(), r#""access""#);
        let class: TokenClass = serde_json::from_str(r#""refresh""#).unwrap();
        assert_eq!(class, TokenClass::Refresh);
    }
}
